//! Fade the page post overlay in or out.

use super::JobState;
use crate::animator::{AnimationJob, JobContext};
use crate::easing::Easing;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FadePostConfig {
    pub duration: f64,
    pub easing: Easing,
}

impl Default for FadePostConfig {
    fn default() -> Self {
        Self {
            duration: 400.0,
            easing: Easing::EaseInOutQuad,
        }
    }
}

pub struct FadePostJob {
    config: FadePostConfig,
    state: JobState,
    is_fading_in: bool,
}

impl FadePostJob {
    pub fn new(config: FadePostConfig, is_fading_in: bool) -> Self {
        Self {
            state: JobState::new(config.duration),
            config,
            is_fading_in,
        }
    }
}

super::job_builders!(FadePostJob);

impl AnimationJob for FadePostJob {
    fn name(&self) -> &'static str {
        "FadePostJob"
    }

    fn start(&mut self, ctx: &mut JobContext<'_>) {
        self.state.start(ctx.current_time);
    }

    fn update(&mut self, ctx: &mut JobContext<'_>, _delta_time: f64) {
        let progress = self.config.easing.apply(self.state.progress(ctx.current_time));
        let opacity = if self.is_fading_in { progress } else { 1.0 - progress };
        if let Some(page_post) = ctx.scene.grid.page_post_mut() {
            page_post.opacity = opacity;
        }
        if self.state.is_elapsed(ctx.current_time) {
            self.state.complete(ctx);
        }
    }

    fn cancel(&mut self, ctx: &mut JobContext<'_>) {
        self.state.cancel(ctx);
    }

    fn is_complete(&self) -> bool {
        self.state.is_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::test_support;

    #[test]
    fn fades_page_post_in() {
        let mut scene = test_support::scene_with_posts(3);
        let mut animator = test_support::animator();
        let tile = scene.grid.content_tiles()[0];
        assert!(scene.grid.create_page_post(tile));

        test_support::start(&mut animator, &mut scene, FadePostJob::new(FadePostConfig::default(), true));
        animator.tick(&mut scene, 200.0);
        let midway = scene.grid.page_post().unwrap().opacity;
        assert!(midway > 0.0 && midway < 1.0);

        test_support::run_until_idle(&mut animator, &mut scene, 200.0, 2_000.0);
        assert_eq!(scene.grid.page_post().unwrap().opacity, 1.0);
    }
}
