pub mod onboarding;

pub use onboarding::consume_onboarding_events;
