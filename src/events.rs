use crate::errors::ListenerError;
use serde::Serialize;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::error;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChallengeEvent {
    ChallengesAssigned { date: String, ids: Vec<String> },
    ChallengeCompleted { id: String, points: u32 },
    ChallengeUncompleted { id: String },
    StreakUpdated { current: u32, longest: u32 },
}

pub type Listener = Box<dyn Fn(&ChallengeEvent) -> Result<(), ListenerError> + Send + Sync>;

#[derive(Default)]
pub struct Listeners {
    listeners: Vec<Listener>,
}

impl Listeners {
    pub fn add(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    // A failing or panicking listener is logged and skipped; the rest still run.
    pub fn notify(&self, event: &ChallengeEvent) {
        for (index, listener) in self.listeners.iter().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| listener(event))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => error!("challenge listener {index} failed: {err}"),
                Err(_) => error!("challenge listener {index} panicked"),
            }
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[test]
    fn failing_listeners_do_not_stop_the_rest() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut listeners = Listeners::default();

        listeners.add(Box::new(|_| Err(ListenerError::new("boom"))));
        listeners.add(Box::new(|_| panic!("listener exploded")));
        let counter = Arc::clone(&calls);
        listeners.add(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));

        listeners.notify(&ChallengeEvent::ChallengeUncompleted {
            id: "water-8".to_string(),
        });
        listeners.notify(&ChallengeEvent::StreakUpdated {
            current: 1,
            longest: 1,
        });

        assert_eq!(listeners.len(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = ChallengeEvent::ChallengeCompleted {
            id: "walk-10k".to_string(),
            points: 25,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "challengeCompleted");
        assert_eq!(value["points"], 25);
    }
}
