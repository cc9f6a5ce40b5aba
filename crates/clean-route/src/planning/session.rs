//! Event dispatch for one traveler's session.
//!
//! A [`TripSession`] actor owns all session state. Context updates are classified with
//! [`ContextChange::between`]: anything touching endpoints, mode or peak hours starts a
//! full planning run, a vulnerability-only change re-enters the recompute pipeline. A
//! newer full run aborts the in-flight one and stale completions are dropped by
//! generation number. Vulnerability changes that arrive mid-run are deferred and
//! applied once the run completes.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::domain::{Coordinate, FinalRoute, TripRequest, VulnerabilityProfile};
use super::pipeline::{PlanningError, RoutePlan, RoutePlanner};
use super::providers::{Geocoder, RouteProvider, TrafficModel};
use super::recompute::recompute_metrics;
use super::scoring::{ScoringClient, ScoringSource};

const COMMAND_BUFFER: usize = 32;

/// How a context update relates to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextChange {
    Unchanged,
    VulnerabilityOnly(VulnerabilityProfile),
    Full,
}

impl ContextChange {
    pub fn between(previous: Option<&TripRequest>, next: &TripRequest) -> Self {
        let Some(previous) = previous else {
            return Self::Full;
        };

        let same_trip = previous.origin == next.origin
            && previous.destination == next.destination
            && previous.context.transport_mode == next.context.transport_mode
            && previous.context.is_peak == next.context.is_peak;

        if !same_trip {
            Self::Full
        } else if previous.context.vulnerability != next.context.vulnerability {
            Self::VulnerabilityOnly(next.context.vulnerability)
        } else {
            Self::Unchanged
        }
    }
}

/// What the presentation layer sees after every state transition.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub request: Option<TripRequest>,
    pub origin: Option<Coordinate>,
    pub destination: Option<Coordinate>,
    pub routes: Vec<FinalRoute>,
    pub scoring_source: Option<ScoringSource>,
    pub loading: bool,
    pub error: Option<PlanningError>,
    pub generation: u64,
}

impl SessionSnapshot {
    pub fn selected(&self, index: usize) -> Option<&FinalRoute> {
        self.routes.get(index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("trip session has shut down")]
pub struct SessionClosed;

enum SessionCommand {
    Update {
        request: TripRequest,
        ack: oneshot::Sender<ContextChange>,
    },
    Refresh {
        ack: oneshot::Sender<bool>,
    },
}

struct Completion {
    generation: u64,
    result: Result<RoutePlan, PlanningError>,
}

/// Client side of a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl std::fmt::Debug for SessionCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionCommand::Update { request, .. } => {
                f.debug_struct("Update").field("request", request).finish()
            }
            SessionCommand::Refresh { .. } => f.write_str("Refresh"),
        }
    }
}

impl SessionHandle {
    /// Submit the traveler's current context; returns how it was dispatched.
    pub async fn update(&self, request: TripRequest) -> Result<ContextChange, SessionClosed> {
        let (ack, applied) = oneshot::channel();
        self.commands
            .send(SessionCommand::Update { request, ack })
            .await
            .map_err(|_| SessionClosed)?;
        applied.await.map_err(|_| SessionClosed)
    }

    /// Rerun the full pipeline for the current request (retry after a failure).
    /// Returns `false` when there is nothing to refresh yet.
    pub async fn refresh(&self) -> Result<bool, SessionClosed> {
        let (ack, started) = oneshot::channel();
        self.commands
            .send(SessionCommand::Refresh { ack })
            .await
            .map_err(|_| SessionClosed)?;
        started.await.map_err(|_| SessionClosed)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Wait until no full planning run is in flight.
    pub async fn settled(&mut self) -> Result<SessionSnapshot, SessionClosed> {
        let snapshot = self
            .snapshots
            .wait_for(|snapshot| !snapshot.loading)
            .await
            .map_err(|_| SessionClosed)?;
        Ok(snapshot.clone())
    }
}

/// Actor owning one traveler's planning state.
pub struct TripSession<G, R, S, T> {
    planner: Arc<RoutePlanner<G, R, S, T>>,
    snapshot: SessionSnapshot,
    publisher: watch::Sender<SessionSnapshot>,
    in_flight: Option<JoinHandle<()>>,
    deferred_profile: Option<VulnerabilityProfile>,
    completions: mpsc::Sender<Completion>,
}

impl<G, R, S, T> TripSession<G, R, S, T>
where
    G: Geocoder + 'static,
    R: RouteProvider + 'static,
    S: ScoringClient + 'static,
    T: TrafficModel + 'static,
{
    /// Start the actor on the current tokio runtime.
    pub fn spawn(planner: Arc<RoutePlanner<G, R, S, T>>) -> (SessionHandle, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (completion_tx, completion_rx) = mpsc::channel(COMMAND_BUFFER);
        let (publisher, snapshots) = watch::channel(SessionSnapshot::default());

        let session = Self {
            planner,
            snapshot: SessionSnapshot::default(),
            publisher,
            in_flight: None,
            deferred_profile: None,
            completions: completion_tx,
        };

        let task = tokio::spawn(session.run(command_rx, completion_rx));
        let handle = SessionHandle {
            commands: command_tx,
            snapshots,
        };
        (handle, task)
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        mut completions: mpsc::Receiver<Completion>,
    ) {
        loop {
            // Commands before completions: queued results meet the newest generation.
            tokio::select! {
                biased;
                command = commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                Some(completion) = completions.recv() => self.complete(completion),
            }
        }

        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
        debug!("trip session stopped");
    }

    fn handle(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Update { request, ack } => {
                let change = ContextChange::between(self.snapshot.request.as_ref(), &request);
                match change {
                    ContextChange::Full => self.start_full_run(request),
                    ContextChange::VulnerabilityOnly(profile) => {
                        self.apply_vulnerability(request, profile)
                    }
                    ContextChange::Unchanged => {}
                }
                let _ = ack.send(change);
            }
            SessionCommand::Refresh { ack } => {
                let request = self.snapshot.request.clone();
                let started = request.is_some();
                if let Some(request) = request {
                    self.start_full_run(request);
                }
                let _ = ack.send(started);
            }
        }
    }

    fn start_full_run(&mut self, request: TripRequest) {
        if let Some(previous) = self.in_flight.take() {
            debug!(
                generation = self.snapshot.generation,
                "superseding in-flight planning run"
            );
            previous.abort();
        }

        self.snapshot.generation += 1;
        self.snapshot.loading = true;
        self.snapshot.error = None;
        self.snapshot.request = Some(request.clone());
        self.deferred_profile = None;

        let generation = self.snapshot.generation;
        let planner = Arc::clone(&self.planner);
        let completions = self.completions.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let result = planner.plan(&request).await;
            let _ = completions.send(Completion { generation, result }).await;
        }));

        self.publish();
    }

    fn apply_vulnerability(&mut self, request: TripRequest, profile: VulnerabilityProfile) {
        self.snapshot.request = Some(request);

        if self.snapshot.loading {
            debug!(
                profile = profile.label(),
                "deferring vulnerability change until refetch completes"
            );
            self.deferred_profile = Some(profile);
        } else {
            self.recompute_routes();
        }

        self.publish();
    }

    fn complete(&mut self, completion: Completion) {
        if completion.generation != self.snapshot.generation {
            debug!(
                stale = completion.generation,
                current = self.snapshot.generation,
                "discarding stale planning result"
            );
            return;
        }

        self.in_flight = None;
        self.snapshot.loading = false;

        match completion.result {
            Ok(plan) => {
                info!(generation = completion.generation, "session routes updated");
                self.snapshot.origin = Some(plan.origin);
                self.snapshot.destination = Some(plan.destination);
                self.snapshot.scoring_source = Some(plan.scoring_source);
                self.snapshot.routes = plan.routes;
            }
            Err(err) => {
                warn!(error = %err, "planning run failed, keeping previous routes");
                self.snapshot.error = Some(err);
            }
        }

        if self.deferred_profile.take().is_some() {
            self.recompute_routes();
        }

        self.publish();
    }

    fn recompute_routes(&mut self) {
        if let Some(request) = &self.snapshot.request {
            self.snapshot.routes = recompute_metrics(&self.snapshot.routes, &request.context);
        }
    }

    fn publish(&self) {
        self.publisher.send_replace(self.snapshot.clone());
    }
}
