use crate::subscription::{SubscriptionId, SubscriptionSource};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::borrow::Cow;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// A repeating timer that fires at a fixed interval.
///
/// Each tick emits the current [`Instant`]. `id` keeps several timers apart,
/// so widgets that can exist more than once pass an owned, per-instance id.
/// The first tick fires one full interval after the subscription starts.
///
/// # Example
///
/// ```rust,ignore
/// use std::time::Duration;
/// use sift_core::{subscribe, Every};
///
/// let sub = subscribe(Every::new(Duration::from_millis(16), "reveal"))
///     .map(|_| Msg::AnimationTick);
/// ```
pub struct Every {
    /// The interval between ticks.
    pub interval: Duration,
    /// Distinguishes this timer from others.
    pub id: Cow<'static, str>,
}

impl Every {
    /// Create a new repeating timer with the given interval and identifier.
    pub fn new(interval: Duration, id: impl Into<Cow<'static, str>>) -> Self {
        Self {
            interval,
            id: id.into(),
        }
    }
}

impl SubscriptionSource for Every {
    type Output = Instant;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::with_str::<Self>(&self.id)
    }

    fn stream(self) -> BoxStream<'static, Instant> {
        let period = self.interval.max(Duration::from_millis(1));
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let stream = tokio_stream::wrappers::IntervalStream::new(interval)
            .map(|tick| tick.into_std());
        Box::pin(stream)
    }
}
