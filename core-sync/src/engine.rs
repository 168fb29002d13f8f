//! The reconciliation orchestrator.
//!
//! `SyncEngine` drives one-way mirroring: on each trigger it fetches the
//! source playlists, resolves unknown tracks against the target catalog,
//! diffs the desired sequence against the live target playlist, and applies
//! the edits under optimistic concurrency. Triggers are single-flight; a
//! trigger that arrives mid-run is dropped, not queued.

use crate::diff::{self, Edit};
use crate::error::Result;
use crate::report::{CycleOutcome, CycleStatus, EngineState, EngineStateCell, SyncReport};
use crate::resolver::TrackResolver;
use catalog_traits::{SourceCatalog, SourcePlaylist, TargetCatalog};
use core_auth::CredentialStore;
use core_store::{
    LocalTrackId, PlaylistLink, PlaylistLinkRepository, ResolvedTrack, SelectionRepository,
    TrackRepository,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Tuning knobs for a [`SyncEngine`].
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Pause before each catalog search, to stay under the target
    /// service's rate limits
    pub resolve_delay: Duration,
    /// Maximum hits requested per catalog search
    pub search_limit: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            resolve_delay: Duration::from_secs(1),
            search_limit: 20,
        }
    }
}

/// One-way playlist mirroring engine.
pub struct SyncEngine {
    source: Arc<dyn SourceCatalog>,
    target: Arc<dyn TargetCatalog>,
    credentials: Arc<CredentialStore>,
    tracks: Arc<dyn TrackRepository>,
    links: Arc<dyn PlaylistLinkRepository>,
    selection: Arc<dyn SelectionRepository>,
    resolver: TrackResolver,
    state: EngineStateCell,
    config: SyncConfig,
}

impl SyncEngine {
    pub fn new(
        source: Arc<dyn SourceCatalog>,
        target: Arc<dyn TargetCatalog>,
        credentials: Arc<CredentialStore>,
        tracks: Arc<dyn TrackRepository>,
        links: Arc<dyn PlaylistLinkRepository>,
        selection: Arc<dyn SelectionRepository>,
        config: SyncConfig,
    ) -> Self {
        let resolver = TrackResolver::new(target.clone(), config.search_limit);
        Self {
            source,
            target,
            credentials,
            tracks,
            links,
            selection,
            resolver,
            state: EngineStateCell::default(),
            config,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state.state()
    }

    /// Complete the source-service login with an authorization code.
    pub async fn login(&self, code: &str) -> Result<()> {
        self.credentials.login(code).await?;
        Ok(())
    }

    /// Drop the source-service session and clear the active selection.
    pub async fn logout(&self) -> Result<()> {
        self.credentials.logout().await?;
        self.selection.set_active(&[]).await?;
        info!("Logged out, selection cleared");
        Ok(())
    }

    /// Replace the set of playlists to keep mirrored.
    ///
    /// A newly selected source playlist with no existing link gets its
    /// target playlist created and the link persisted here; syncing the
    /// contents is left to the next [`update_playlists`](Self::update_playlists)
    /// run. Deselection only shrinks the set and never deletes anything.
    #[instrument(skip(self, source_ids), fields(count = source_ids.len()))]
    pub async fn update_active_playlists(&self, source_ids: &[String]) -> Result<()> {
        let available = self.source.playlists().await?;
        let mut active = Vec::with_capacity(source_ids.len());

        for source_id in source_ids {
            let target_id = match self.links.find_by_source_id(source_id).await? {
                Some(link) => link.target_id,
                None => {
                    let Some(playlist) = available.iter().find(|p| &p.id == source_id) else {
                        warn!(source_id = %source_id, "Selected playlist not found on source service");
                        continue;
                    };
                    let target_id = self
                        .target
                        .create_playlist(&playlist.name, &playlist.description)
                        .await?;
                    let link = PlaylistLink {
                        name: playlist.name.clone(),
                        source_id: playlist.id.clone(),
                        target_id: target_id.clone(),
                        track_sequence: Vec::new(),
                    };
                    self.links.add_playlist(&link).await?;
                    info!(name = %link.name, target_id = %target_id, "Created target playlist and link");
                    target_id
                }
            };
            active.push(target_id);
        }

        self.selection.set_active(&active).await?;
        Ok(())
    }

    /// Run one sync cycle for every active playlist link.
    ///
    /// Per-playlist failures are contained in the returned report; this
    /// never fails outright. A trigger while a run is in progress is
    /// dropped with a warning.
    pub async fn update_playlists(&self) -> SyncReport {
        if !self.state.try_begin() {
            warn!("Playlist update already in progress, dropping trigger");
            return SyncReport::dropped();
        }

        let report = self.run().await;
        self.state.finish();
        report
    }

    async fn run(&self) -> SyncReport {
        if let Err(e) = self.credentials.ensure_fresh().await {
            warn!(error = %e, "Not authenticated against the source service, skipping run");
            return SyncReport::empty();
        }

        let source_playlists = match self.source.playlists().await {
            Ok(playlists) => playlists,
            Err(e) => {
                error!(error = %e, "Failed to list source playlists");
                return SyncReport::empty();
            }
        };
        if source_playlists.is_empty() {
            warn!("No source playlists found");
            return SyncReport::empty();
        }

        let active = match self.selection.active_playlists().await {
            Ok(active) => active,
            Err(e) => {
                error!(error = %e, "Failed to load the active selection");
                return SyncReport::empty();
            }
        };
        if active.is_empty() {
            warn!("No playlists selected for sync");
            return SyncReport::empty();
        }

        let links = match self.links.get_playlists().await {
            Ok(links) => links,
            Err(e) => {
                error!(error = %e, "Failed to load playlist links");
                return SyncReport::empty();
            }
        };

        let mut report = SyncReport::empty();
        for target_id in &active {
            let Some(link) = links.iter().find(|l| &l.target_id == target_id) else {
                error!(target_id = %target_id, "No link for selected playlist, reselect it");
                continue;
            };
            let Some(playlist) = source_playlists.iter().find(|p| p.id == link.source_id) else {
                error!(name = %link.name, "Linked playlist missing from the source service");
                report
                    .outcomes
                    .push(CycleOutcome::skipped(&link.source_id, &link.name));
                continue;
            };
            report.outcomes.push(self.sync_one(link, playlist).await);
        }
        report
    }

    #[instrument(skip(self, link, playlist), fields(name = %link.name))]
    async fn sync_one(&self, link: &PlaylistLink, playlist: &SourcePlaylist) -> CycleOutcome {
        let mut outcome = CycleOutcome::skipped(&link.source_id, &link.name);

        let source_tracks = match self.source.playlist_tracks(&link.source_id).await {
            Ok(tracks) => tracks,
            Err(e) => {
                error!(error = %e, "Failed to list source tracks");
                return outcome;
            }
        };
        if source_tracks.is_empty() {
            warn!(name = %playlist.name, "Source playlist has no tracks");
            return outcome;
        }

        let mut desired: Vec<ResolvedTrack> = Vec::with_capacity(source_tracks.len());
        for track in &source_tracks {
            let known = match self.tracks.find_by_source_id(&track.id).await {
                Ok(known) => known,
                Err(e) => {
                    error!(error = %e, "Track lookup failed");
                    return outcome;
                }
            };
            if let Some(resolved) = known {
                desired.push(resolved);
                continue;
            }

            if !self.config.resolve_delay.is_zero() {
                tokio::time::sleep(self.config.resolve_delay).await;
            }
            match self.resolver.resolve(track).await {
                Ok(resolved) => {
                    if let Err(e) = self.tracks.add_track(&resolved).await {
                        error!(error = %e, "Failed to persist resolved track");
                        return outcome;
                    }
                    outcome.resolved += 1;
                    desired.push(resolved);
                }
                Err(e) => {
                    warn!(title = %track.title, error = %e, "Dropping unresolvable track");
                    outcome.dropped += 1;
                }
            }
        }

        if desired.is_empty() {
            warn!(name = %link.name, "No resolvable tracks in playlist");
            return outcome;
        }

        let sequence: Vec<LocalTrackId> = desired.iter().map(|t| t.id).collect();
        if sequence == link.track_sequence {
            debug!(name = %link.name, "No changes detected");
            outcome.status = CycleStatus::Unchanged;
            return outcome;
        }

        let snapshot = match self.target.playlist_snapshot(&link.target_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(error = %e, "Failed to snapshot the target playlist");
                return outcome;
            }
        };

        let desired_ids: Vec<String> = desired.iter().map(|t| t.target_id.clone()).collect();
        let plan = diff::edit_plan(&snapshot.item_ids, &desired_ids);

        let mut token = snapshot.token;
        for edit in &plan {
            match edit {
                Edit::Insert { track_id, position } => {
                    match self
                        .target
                        .insert_item(&link.target_id, track_id, *position, &token)
                        .await
                    {
                        Ok(refreshed) => {
                            // A missing header means the old token is still valid.
                            if let Some(fresh) = refreshed {
                                token = fresh;
                            }
                            outcome.inserted += 1;
                        }
                        Err(e) => {
                            error!(track_id = %track_id, error = %e, "Insert rejected, aborting remaining edits");
                            outcome.status = CycleStatus::Aborted;
                            return outcome;
                        }
                    }
                }
                Edit::Delete { index } => {
                    if let Err(e) = self.target.delete_item(&link.target_id, *index).await {
                        warn!(index, error = %e, "Failed to delete playlist item");
                    } else {
                        outcome.deleted += 1;
                    }
                }
            }
        }

        let mut updated = link.clone();
        updated.track_sequence = sequence;
        if let Err(e) = self.links.update_playlist(&updated).await {
            error!(error = %e, "Failed to commit believed state");
            outcome.status = CycleStatus::Aborted;
            return outcome;
        }

        info!(name = %link.name, tracks = desired.len(), "Playlist updated");
        outcome.status = CycleStatus::Committed;
        outcome
    }
}
