//! Animator: the single cooperative job scheduler
//!
//! The animator keeps an insertion-ordered list of jobs. Every frame it
//! updates each job that was present when the pass began, retires the ones
//! that completed, then draws everything that remains. When the list drains
//! it pauses itself; the next `start_job` kicks the loop again through the
//! [`FrameScheduler`].
//!
//! Jobs never touch the animator directly. They queue start/cancel requests
//! on their [`JobContext`], and the animator processes those synchronously
//! after the call that issued them returns.

use crate::config::AnimatorConfig;
use crate::scene::Scene;
use crate::time::FrameClock;
use hexweave_metrics::{FrameTimer, JobCounter};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Handle to a started job.
pub type JobId = u64;

/// How a job finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Completed,
    Cancelled,
}

impl JobOutcome {
    #[inline]
    pub fn was_cancelled(self) -> bool {
        matches!(self, JobOutcome::Cancelled)
    }
}

/// Completion callback. Fires exactly once, on completion or cancellation.
pub type JobCallback = Box<dyn FnOnce(&mut JobContext<'_>, JobOutcome)>;

/// The platform's animation-frame primitive.
pub trait FrameScheduler {
    /// Ask the host to call [`Animator::tick`] on its next frame.
    fn request_frame(&mut self);
}

/// Scheduler for hosts that tick unconditionally.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScheduler;

impl FrameScheduler for NoopScheduler {
    fn request_frame(&mut self) {}
}

/// Lifecycle contract shared by every animation job.
///
/// not-started → running → complete, with `cancel` as the alternate
/// running → complete transition.
pub trait AnimationJob {
    /// Short name for logs and metrics.
    fn name(&self) -> &'static str;

    fn start(&mut self, ctx: &mut JobContext<'_>);

    fn update(&mut self, ctx: &mut JobContext<'_>, delta_time: f64);

    /// Flush job-local visuals. Most jobs mutate tile state in `update` instead.
    fn draw(&mut self, _ctx: &mut JobContext<'_>) {}

    /// Stop early, running the same completion path with [`JobOutcome::Cancelled`].
    fn cancel(&mut self, ctx: &mut JobContext<'_>);

    /// The grid dropped every tile at arena index `first` or beyond, and may
    /// hand those ids out again. Forget them and return true, or return
    /// false to be cancelled.
    fn release_tiles(&mut self, _first: usize) -> bool {
        true
    }

    fn is_complete(&self) -> bool;
}

enum JobRequest {
    Start(JobId, Box<dyn AnimationJob>),
    Cancel(JobId),
}

#[derive(Default)]
struct JobQueue {
    requests: VecDeque<JobRequest>,
    next_id: JobId,
}

impl JobQueue {
    fn allocate(&mut self) -> JobId {
        self.next_id += 1;
        self.next_id
    }
}

/// What a job sees while it runs.
pub struct JobContext<'a> {
    pub scene: &'a mut Scene,
    pub current_time: f64,
    queue: &'a mut JobQueue,
}

impl<'a> JobContext<'a> {
    /// Start `job` once the current call returns. It is not updated before
    /// the next frame.
    pub fn start_job(&mut self, job: Box<dyn AnimationJob>) -> JobId {
        let id = self.queue.allocate();
        self.queue.requests.push_back(JobRequest::Start(id, job));
        id
    }

    /// Cancel job `id` once the current call returns.
    pub fn cancel_job(&mut self, id: JobId) {
        self.queue.requests.push_back(JobRequest::Cancel(id));
    }
}

struct JobEntry {
    id: JobId,
    job: Box<dyn AnimationJob>,
}

pub struct Animator {
    jobs: Vec<JobEntry>,
    queue: JobQueue,
    is_paused: bool,
    is_looping: bool,
    clock: FrameClock,
    scheduler: Box<dyn FrameScheduler>,
    frame_timer: FrameTimer,
    job_counter: JobCounter,
}

impl Animator {
    pub fn new(config: &AnimatorConfig, scheduler: Box<dyn FrameScheduler>) -> Self {
        Self {
            jobs: Vec::new(),
            queue: JobQueue::default(),
            is_paused: true,
            is_looping: false,
            clock: FrameClock::new(config.delta_time_upper_threshold),
            scheduler,
            frame_timer: FrameTimer::new(config.frame_timer_window),
            job_counter: JobCounter::new(),
        }
    }

    pub fn apply_config(&mut self, config: &AnimatorConfig) {
        self.clock.set_upper_threshold(config.delta_time_upper_threshold);
    }

    /// Start `job` at `current_time` and make sure the loop is running.
    pub fn start_job(&mut self, scene: &mut Scene, job: Box<dyn AnimationJob>, current_time: f64) -> JobId {
        let id = self.queue.allocate();
        self.start_with_id(scene, id, job, current_time);
        self.drain_requests(scene, current_time);
        id
    }

    fn start_with_id(&mut self, scene: &mut Scene, id: JobId, mut job: Box<dyn AnimationJob>, current_time: f64) {
        {
            let mut ctx = JobContext {
                scene: &mut *scene,
                current_time,
                queue: &mut self.queue,
            };
            job.start(&mut ctx);
        }
        self.job_counter.record_start(job.name());
        debug!(job = job.name(), id, "job started");
        self.jobs.push(JobEntry { id, job });

        self.is_paused = false;
        if !self.is_looping {
            self.is_looping = true;
            self.scheduler.request_frame();
        }
    }

    /// Cancel job `id`, firing its completion callback with the cancelled
    /// outcome. Returns false when no such job is running.
    pub fn cancel_job(&mut self, scene: &mut Scene, id: JobId, current_time: f64) -> bool {
        let cancelled = self.cancel_entry(scene, id, current_time);
        self.drain_requests(scene, current_time);
        cancelled
    }

    fn cancel_entry(&mut self, scene: &mut Scene, id: JobId, current_time: f64) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let mut entry = self.jobs.remove(index);
        {
            let mut ctx = JobContext {
                scene: &mut *scene,
                current_time,
                queue: &mut self.queue,
            };
            entry.job.cancel(&mut ctx);
        }
        self.job_counter.record_finish(entry.job.name(), true);
        debug!(job = entry.job.name(), id, "job cancelled");
        true
    }

    /// Cancel every job, always re-reading the head so jobs started from
    /// cancellation callbacks are cancelled too.
    pub fn cancel_all(&mut self, scene: &mut Scene, current_time: f64) {
        while let Some(id) = self.jobs.first().map(|entry| entry.id) {
            self.cancel_job(scene, id, current_time);
        }
    }

    fn drain_requests(&mut self, scene: &mut Scene, current_time: f64) {
        loop {
            while let Some(request) = self.queue.requests.pop_front() {
                match request {
                    JobRequest::Start(id, job) => self.start_with_id(scene, id, job, current_time),
                    JobRequest::Cancel(id) => {
                        self.cancel_entry(scene, id, current_time);
                    }
                }
            }
            let Some(first) = scene.grid.take_released_tiles() else { break };
            self.release_tiles(scene, first, current_time);
        }
    }

    /// Cancel every job still bound to a tile the grid dropped.
    fn release_tiles(&mut self, scene: &mut Scene, first: usize, current_time: f64) {
        let stale: Vec<JobId> = self
            .jobs
            .iter_mut()
            .filter_map(|entry| (!entry.job.release_tiles(first)).then_some(entry.id))
            .collect();
        for id in stale {
            debug!(id, first, "job target released");
            self.cancel_entry(scene, id, current_time);
        }
    }

    /// Run one animation frame at `current_time` milliseconds.
    pub fn tick(&mut self, scene: &mut Scene, current_time: f64) {
        if self.is_paused || self.jobs.is_empty() {
            self.pause();
            return;
        }

        let frame = self.clock.advance(current_time);
        self.frame_timer.record(frame.delta_time, frame.was_clamped);
        trace!(delta = frame.delta_time, jobs = self.jobs.len(), "tick");

        let ids: Vec<JobId> = self.jobs.iter().map(|entry| entry.id).collect();
        for id in ids {
            let Some(index) = self.index_of(id) else { continue };
            {
                let entry = &mut self.jobs[index];
                let mut ctx = JobContext {
                    scene: &mut *scene,
                    current_time,
                    queue: &mut self.queue,
                };
                entry.job.update(&mut ctx, frame.delta_time);
            }
            if self.jobs[index].job.is_complete() {
                let entry = self.jobs.remove(index);
                self.job_counter.record_finish(entry.job.name(), false);
                debug!(job = entry.job.name(), id, "job completed");
            }
            self.drain_requests(scene, current_time);
        }

        scene.display.begin_frame();
        for entry in &mut self.jobs {
            let mut ctx = JobContext {
                scene: &mut *scene,
                current_time,
                queue: &mut self.queue,
            };
            entry.job.draw(&mut ctx);
        }
        self.drain_requests(scene, current_time);

        if self.jobs.is_empty() {
            self.pause();
        } else {
            self.scheduler.request_frame();
        }
    }

    fn pause(&mut self) {
        if !self.is_paused || self.is_looping {
            debug!("animator paused");
        }
        self.is_paused = true;
        self.is_looping = false;
        self.clock.reset();
    }

    fn index_of(&self, id: JobId) -> Option<usize> {
        self.jobs.iter().position(|entry| entry.id == id)
    }

    #[inline]
    pub fn is_running(&self, id: JobId) -> bool {
        self.index_of(id).is_some()
    }

    #[inline]
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Names of the active jobs in update order.
    pub fn job_names(&self) -> Vec<&'static str> {
        self.jobs.iter().map(|entry| entry.job.name()).collect()
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    #[inline]
    pub fn is_looping(&self) -> bool {
        self.is_looping
    }

    pub fn frame_timer(&self) -> &FrameTimer {
        &self.frame_timer
    }

    pub fn frame_timer_mut(&mut self) -> &mut FrameTimer {
        &mut self.frame_timer
    }

    pub fn job_counter(&self) -> &JobCounter {
        &self.job_counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HexConfig;
    use crate::math::Vec2;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct CountingScheduler(Rc<Cell<usize>>);

    impl FrameScheduler for CountingScheduler {
        fn request_frame(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    /// Completes after `frames` updates; logs every lifecycle call.
    struct ProbeJob {
        label: &'static str,
        frames: usize,
        updates: usize,
        complete: bool,
        log: Rc<RefCell<Vec<String>>>,
        deltas: Rc<RefCell<Vec<f64>>>,
        on_complete: Option<JobCallback>,
    }

    impl ProbeJob {
        fn new(label: &'static str, frames: usize, log: &Rc<RefCell<Vec<String>>>) -> Self {
            Self {
                label,
                frames,
                updates: 0,
                complete: false,
                log: Rc::clone(log),
                deltas: Rc::new(RefCell::new(Vec::new())),
                on_complete: None,
            }
        }

        fn finish(&mut self, ctx: &mut JobContext<'_>, outcome: JobOutcome) {
            if self.complete {
                return;
            }
            self.complete = true;
            if let Some(callback) = self.on_complete.take() {
                callback(ctx, outcome);
            }
        }
    }

    impl AnimationJob for ProbeJob {
        fn name(&self) -> &'static str {
            "ProbeJob"
        }

        fn start(&mut self, _ctx: &mut JobContext<'_>) {
            self.log.borrow_mut().push(format!("start {}", self.label));
        }

        fn update(&mut self, ctx: &mut JobContext<'_>, delta_time: f64) {
            self.updates += 1;
            self.deltas.borrow_mut().push(delta_time);
            self.log.borrow_mut().push(format!("update {}", self.label));
            if self.updates >= self.frames {
                self.finish(ctx, JobOutcome::Completed);
            }
        }

        fn draw(&mut self, _ctx: &mut JobContext<'_>) {
            self.log.borrow_mut().push(format!("draw {}", self.label));
        }

        fn cancel(&mut self, ctx: &mut JobContext<'_>) {
            self.log.borrow_mut().push(format!("cancel {}", self.label));
            self.finish(ctx, JobOutcome::Cancelled);
        }

        fn is_complete(&self) -> bool {
            self.complete
        }
    }

    fn fixture() -> (Scene, Animator, Rc<Cell<usize>>) {
        let scene = Scene::new(HexConfig::default(), Vec::new(), Vec2::new(400.0, 300.0), 1);
        let requests = Rc::new(Cell::new(0));
        let animator = Animator::new(
            &HexConfig::default().animator,
            Box::new(CountingScheduler(Rc::clone(&requests))),
        );
        (scene, animator, requests)
    }

    #[test]
    fn drains_and_restarts() {
        let (mut scene, mut animator, requests) = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (label, frames) in [("a", 1), ("b", 3), ("c", 2)] {
            animator.start_job(&mut scene, Box::new(ProbeJob::new(label, frames, &log)), 0.0);
        }
        assert_eq!(requests.get(), 1);
        assert!(animator.is_looping());

        let mut time = 0.0;
        while animator.job_count() > 0 {
            time += 16.0;
            animator.tick(&mut scene, time);
            assert!(time < 1000.0);
        }
        assert!(animator.is_paused());
        assert!(!animator.is_looping());

        let before = requests.get();
        animator.start_job(&mut scene, Box::new(ProbeJob::new("d", 1, &log)), time);
        assert!(animator.is_looping());
        assert!(!animator.is_paused());
        assert_eq!(requests.get(), before + 1);
    }

    #[test]
    fn updates_then_draws_in_start_order() {
        let (mut scene, mut animator, _) = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        animator.start_job(&mut scene, Box::new(ProbeJob::new("a", 5, &log)), 0.0);
        animator.start_job(&mut scene, Box::new(ProbeJob::new("b", 5, &log)), 0.0);
        log.borrow_mut().clear();

        animator.tick(&mut scene, 16.0);
        assert_eq!(*log.borrow(), vec!["update a", "update b", "draw a", "draw b"]);
    }

    #[test]
    fn completed_jobs_are_not_drawn() {
        let (mut scene, mut animator, _) = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        animator.start_job(&mut scene, Box::new(ProbeJob::new("a", 1, &log)), 0.0);
        animator.start_job(&mut scene, Box::new(ProbeJob::new("b", 5, &log)), 0.0);
        log.borrow_mut().clear();
        animator.tick(&mut scene, 16.0);
        assert_eq!(*log.borrow(), vec!["update a", "update b", "draw b"]);
        assert_eq!(animator.job_names(), vec!["ProbeJob"]);
    }

    #[test]
    fn jobs_started_during_update_wait_for_next_frame() {
        let (mut scene, mut animator, _) = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut parent = ProbeJob::new("parent", 1, &log);
        let child_log = Rc::clone(&log);
        parent.on_complete = Some(Box::new(move |ctx, outcome| {
            assert_eq!(outcome, JobOutcome::Completed);
            ctx.start_job(Box::new(ProbeJob::new("child", 1, &child_log)));
        }));
        animator.start_job(&mut scene, Box::new(parent), 0.0);
        log.borrow_mut().clear();

        animator.tick(&mut scene, 16.0);
        assert!(!log.borrow().iter().any(|entry| entry == "update child"));
        assert!(log.borrow().iter().any(|entry| entry == "start child"));

        animator.tick(&mut scene, 32.0);
        assert!(log.borrow().iter().any(|entry| entry == "update child"));
        assert_eq!(animator.job_count(), 0);
    }

    #[test]
    fn cancel_fires_callback_once() {
        let (mut scene, mut animator, _) = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        let outcomes = Rc::new(RefCell::new(Vec::new()));

        let mut job = ProbeJob::new("a", 100, &log);
        let seen = Rc::clone(&outcomes);
        job.on_complete = Some(Box::new(move |_, outcome| seen.borrow_mut().push(outcome)));
        let id = animator.start_job(&mut scene, Box::new(job), 0.0);

        assert!(animator.cancel_job(&mut scene, id, 5.0));
        assert!(!animator.cancel_job(&mut scene, id, 6.0));
        assert_eq!(*outcomes.borrow(), vec![JobOutcome::Cancelled]);
        assert!(!animator.is_running(id));
    }

    #[test]
    fn cancel_all_reaches_jobs_started_by_callbacks() {
        let (mut scene, mut animator, _) = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut job = ProbeJob::new("a", 100, &log);
        let follow_up_log = Rc::clone(&log);
        job.on_complete = Some(Box::new(move |ctx, _| {
            ctx.start_job(Box::new(ProbeJob::new("follow-up", 100, &follow_up_log)));
        }));
        animator.start_job(&mut scene, Box::new(job), 0.0);
        animator.start_job(&mut scene, Box::new(ProbeJob::new("b", 100, &log)), 0.0);

        animator.cancel_all(&mut scene, 10.0);
        assert_eq!(animator.job_count(), 0);
        assert!(log.borrow().iter().any(|entry| entry == "cancel follow-up"));
    }

    #[test]
    fn delta_is_clamped() {
        let (mut scene, mut animator, _) = fixture();
        let log = Rc::new(RefCell::new(Vec::new()));
        let job = ProbeJob::new("a", 10, &log);
        let deltas = Rc::clone(&job.deltas);
        animator.start_job(&mut scene, Box::new(job), 0.0);

        animator.tick(&mut scene, 0.0);
        animator.tick(&mut scene, 16.0);
        animator.tick(&mut scene, 10_000.0);
        let threshold = HexConfig::default().animator.delta_time_upper_threshold;
        assert_eq!(*deltas.borrow(), vec![0.0, 16.0, threshold]);
    }
}
