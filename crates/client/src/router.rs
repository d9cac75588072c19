//! Navigation commands.
//!
//! Forced navigation (the redirect-to-login on authorization failure) is an
//! explicit command published through a channel, never a global side
//! effect: the transport layer announces *where* the user must go, and
//! whatever front-end is attached decides *how* to get there.

use tokio::sync::watch;

/// A navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// The login screen. Published when a 401 is observed.
    Login,
    /// The authenticated landing screen.
    Dashboard,
}

/// Sending half of the navigation channel.
///
/// Cheap to clone. Publishing never fails: if the front-end has already
/// shut down (the receiving half is dropped), the command is discarded -
/// a response arriving after "unmount" must not crash anything.
#[derive(Debug, Clone)]
pub struct Navigator {
    tx: watch::Sender<Option<Destination>>,
}

impl Navigator {
    /// Create a connected navigator / event-stream pair.
    #[must_use]
    pub fn channel() -> (Self, NavigationEvents) {
        let (tx, rx) = watch::channel(None);
        (Self { tx }, NavigationEvents { rx })
    }

    /// Publish a navigation command.
    pub fn navigate(&self, destination: Destination) {
        tracing::debug!(?destination, "navigation requested");
        // send_replace never fails, even with no live receiver.
        self.tx.send_replace(Some(destination));
    }
}

/// Receiving half of the navigation channel.
#[derive(Debug)]
pub struct NavigationEvents {
    rx: watch::Receiver<Option<Destination>>,
}

impl NavigationEvents {
    /// The most recently published command, consuming it.
    ///
    /// Returns `None` when nothing new has been published since the last
    /// call.
    pub fn take(&mut self) -> Option<Destination> {
        if self.rx.has_changed().unwrap_or(false) {
            *self.rx.borrow_and_update()
        } else {
            None
        }
    }

    /// Wait until a command is published, then return it.
    ///
    /// Returns `None` if every `Navigator` handle has been dropped.
    pub async fn next(&mut self) -> Option<Destination> {
        loop {
            self.rx.changed().await.ok()?;
            if let Some(destination) = *self.rx.borrow_and_update() {
                return Some(destination);
            }
        }
    }
}
