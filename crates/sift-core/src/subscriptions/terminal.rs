use crate::event::TerminalEvent;
use crate::subscription::{forward, Subscription, SubscriptionId};
use crossterm::event::EventStream;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Marker type giving the terminal event subscription its identity.
pub struct TerminalEvents;

/// Subscribe to terminal events, mapping each through `map`.
///
/// Returning `None` from `map` discards the event. Because the id is the same
/// on every call, the closure captured on the *first* call stays active;
/// route on model state inside `update`, not inside `map`.
///
/// # Example
///
/// ```rust,ignore
/// fn subscriptions(&self) -> Vec<Subscription<Msg>> {
///     vec![terminal_events(|event| match event {
///         TerminalEvent::Key(key) => Some(Msg::Key(key)),
///         TerminalEvent::Mouse(mouse) => Some(Msg::Mouse(mouse)),
///         TerminalEvent::FocusLost => Some(Msg::Blur),
///         _ => None,
///     })]
/// }
/// ```
pub fn terminal_events<Msg: Send + 'static>(
    map: impl Fn(TerminalEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    let map = Arc::new(map);

    // The EventStream is created inside the spawned task: constructing one
    // eagerly on every subscriptions() call would poke crossterm's global
    // reader while the live stream is polling it.
    Subscription {
        id: SubscriptionId::of::<TerminalEvents>(),
        spawn: Box::new(move |tx: mpsc::UnboundedSender<Msg>| {
            let stream = EventStream::new().filter_map(move |result| {
                let map = map.clone();
                async move {
                    match result {
                        Ok(event) => TerminalEvent::from_crossterm(event).and_then(|e| map(e)),
                        Err(err) => {
                            tracing::warn!(%err, "terminal event read failed");
                            None
                        }
                    }
                }
            });
            forward(Box::pin(stream), tx)
        }),
    }
}
