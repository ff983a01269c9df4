#![forbid(unsafe_code)]

//! The two sub-pages: the goals checklist and the year-in-review cards.
//!
//! Both pages run their entrance when the router lands on them and cancel it
//! when the router leaves. Repeated rows are animated as members of one
//! target group ([`Target::nth`]), started on a linear stagger.

use std::time::Duration;

use folio_core::animation::stagger::stagger_offsets;
use folio_core::animation::{Animator, Step, Timeline, ease_out, ease_out_cubic};
use folio_core::scene::{Prop, Scene, Target};

use crate::content::{Goal, MonthHighlight};

pub const GOALS_HEADER: Target = Target::new("goals.header");
pub const GOAL_ITEM: Target = Target::new("goals.item");
pub const GOALS_BAR: Target = Target::new("goals.bar");
pub const REVIEW_HEADER: Target = Target::new("review.header");
pub const MONTH_CARD: Target = Target::new("review.card");

const HEADER: Duration = Duration::from_millis(1000);
const HEADER_DELAY: Duration = Duration::from_millis(200);
const HEADER_RISE: f32 = 30.0;

const ITEM: Duration = Duration::from_millis(600);
const ITEM_STAGGER: Duration = Duration::from_millis(100);
const ITEM_DELAY: Duration = Duration::from_millis(500);
const ITEM_SHIFT: f32 = -20.0;
const BAR: Duration = Duration::from_millis(500);

const CARD: Duration = Duration::from_millis(800);
const CARD_STAGGER: Duration = Duration::from_millis(50);
const CARD_DELAY: Duration = Duration::from_millis(400);
const CARD_RISE: f32 = 50.0;

/// Completed share of `goals`, in percent. An empty list is 0%.
pub fn goal_progress(goals: &[Goal]) -> f32 {
    if goals.is_empty() {
        return 0.0;
    }
    let done = goals.iter().filter(|g| g.completed).count();
    done as f32 / goals.len() as f32 * 100.0
}

/// Header entrance shared by both pages.
fn header_in(timeline: Timeline, header: Target) -> Timeline {
    timeline
        .at(
            HEADER_DELAY,
            Step::from_to(header, Prop::Y, HEADER_RISE, 0.0, HEADER).ease(ease_out_cubic),
        )
        .with(Step::from_to(header, Prop::Opacity, 0.0, 1.0, HEADER).ease(ease_out_cubic))
}

/// Hide `count` members of `group` (plus `header`) at their start values so
/// nothing flashes before its staggered start.
fn prime(
    animator: &mut Animator,
    header: Target,
    group: Target,
    count: usize,
    prop: Prop,
    from: f32,
) {
    animator.set(header, Prop::Y, HEADER_RISE);
    animator.set(header, Prop::Opacity, 0.0);
    for i in 0..count {
        animator.set(group.nth(i as u16), prop, from);
        animator.set(group.nth(i as u16), Prop::Opacity, 0.0);
    }
}

#[derive(Debug, Clone)]
pub struct GoalsPage {
    goals: Vec<Goal>,
}

impl GoalsPage {
    pub fn new(goals: Vec<Goal>) -> Self {
        Self { goals }
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn progress(&self) -> f32 {
        goal_progress(&self.goals)
    }

    pub fn enter(&self, animator: &mut Animator, reduced_motion: bool) {
        let count = self.goals.len();
        if reduced_motion {
            animator.set(GOALS_HEADER, Prop::Y, 0.0);
            animator.set(GOALS_HEADER, Prop::Opacity, 1.0);
            for i in 0..count {
                animator.set(GOAL_ITEM.nth(i as u16), Prop::X, 0.0);
                animator.set(GOAL_ITEM.nth(i as u16), Prop::Opacity, 1.0);
            }
            animator.set(GOALS_BAR, Prop::Width, self.progress());
            return;
        }

        prime(animator, GOALS_HEADER, GOAL_ITEM, count, Prop::X, ITEM_SHIFT);
        animator.set(GOALS_BAR, Prop::Width, 0.0);

        let mut timeline = header_in(Timeline::new(), GOALS_HEADER);
        for (i, offset) in stagger_offsets(count, ITEM_STAGGER).into_iter().enumerate() {
            let item = GOAL_ITEM.nth(i as u16);
            timeline = timeline
                .at(
                    ITEM_DELAY + offset,
                    Step::from_to(item, Prop::X, ITEM_SHIFT, 0.0, ITEM).ease(ease_out),
                )
                .with(Step::from_to(item, Prop::Opacity, 0.0, 1.0, ITEM).ease(ease_out));
        }
        timeline = timeline.at(
            Duration::ZERO,
            Step::to(GOALS_BAR, Prop::Width, self.progress(), BAR).ease(ease_out),
        );
        animator.play(timeline);
    }

    pub fn leave(&self, animator: &mut Animator) {
        animator.cancel_target(GOALS_HEADER);
        animator.cancel_target(GOALS_BAR);
        for i in 0..self.goals.len() {
            animator.cancel_target(GOAL_ITEM.nth(i as u16));
        }
    }

    pub fn view(&self, animator: &Animator, scene: &mut Scene) {
        scene.set_text("goals.progress", format!("{}%", self.progress().round()));
        scene.set_prop(GOALS_BAR, Prop::Width, animator.value(GOALS_BAR, Prop::Width));
        for prop in [Prop::Y, Prop::Opacity] {
            scene.set_prop(GOALS_HEADER, prop, animator.value(GOALS_HEADER, prop));
        }
        for (i, goal) in self.goals.iter().enumerate() {
            let item = GOAL_ITEM.nth(i as u16);
            scene.set_flag(format!("goals.item.{}.done", goal.id), goal.completed);
            for prop in [Prop::X, Prop::Opacity] {
                scene.set_prop(item, prop, animator.value(item, prop));
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct YearInReviewPage {
    months: Vec<MonthHighlight>,
}

impl YearInReviewPage {
    pub fn new(months: Vec<MonthHighlight>) -> Self {
        Self { months }
    }

    pub fn months(&self) -> &[MonthHighlight] {
        &self.months
    }

    pub fn enter(&self, animator: &mut Animator, reduced_motion: bool) {
        let count = self.months.len();
        if reduced_motion {
            animator.set(REVIEW_HEADER, Prop::Y, 0.0);
            animator.set(REVIEW_HEADER, Prop::Opacity, 1.0);
            for i in 0..count {
                animator.set(MONTH_CARD.nth(i as u16), Prop::Y, 0.0);
                animator.set(MONTH_CARD.nth(i as u16), Prop::Opacity, 1.0);
            }
            return;
        }

        prime(animator, REVIEW_HEADER, MONTH_CARD, count, Prop::Y, CARD_RISE);

        let mut timeline = header_in(Timeline::new(), REVIEW_HEADER);
        for (i, offset) in stagger_offsets(count, CARD_STAGGER).into_iter().enumerate() {
            let card = MONTH_CARD.nth(i as u16);
            timeline = timeline
                .at(
                    CARD_DELAY + offset,
                    Step::from_to(card, Prop::Y, CARD_RISE, 0.0, CARD).ease(ease_out_cubic),
                )
                .with(Step::from_to(card, Prop::Opacity, 0.0, 1.0, CARD).ease(ease_out_cubic));
        }
        animator.play(timeline);
    }

    pub fn leave(&self, animator: &mut Animator) {
        animator.cancel_target(REVIEW_HEADER);
        for i in 0..self.months.len() {
            animator.cancel_target(MONTH_CARD.nth(i as u16));
        }
    }

    pub fn view(&self, animator: &Animator, scene: &mut Scene) {
        for prop in [Prop::Y, Prop::Opacity] {
            scene.set_prop(REVIEW_HEADER, prop, animator.value(REVIEW_HEADER, prop));
        }
        for (i, month) in self.months.iter().enumerate() {
            let card = MONTH_CARD.nth(i as u16);
            scene.set_text(format!("review.card.{i}"), format!("{:02} / {}", i + 1, month.month));
            for prop in [Prop::Y, Prop::Opacity] {
                scene.set_prop(card, prop, animator.value(card, prop));
            }
        }
    }
}
