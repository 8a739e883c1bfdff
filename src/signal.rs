//! Signal source contract: how raw input events reach the monitor.

use tokio::sync::mpsc;

/// A raw input signal delivered by a [`SignalSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The pointer moved.
    PointerMove,
    /// A key was pressed.
    KeyPress,
    /// The window gained focus.
    Focus,
    /// The window lost focus.
    Blur,
    /// Surface visibility flipped; `hidden` is sampled at event time.
    VisibilityChange { hidden: bool },
}

impl Signal {
    /// The registration kind this signal belongs to.
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::PointerMove => SignalKind::PointerMove,
            Signal::KeyPress => SignalKind::KeyPress,
            Signal::Focus => SignalKind::Focus,
            Signal::Blur => SignalKind::Blur,
            Signal::VisibilityChange { .. } => SignalKind::Visibility,
        }
    }
}

/// Registration keys for the signal kinds a source can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    PointerMove,
    KeyPress,
    Focus,
    Blur,
    Visibility,
}

/// Sending half handed to a source at attach time.
pub type SignalSender = mpsc::UnboundedSender<Signal>;

/// Contract the monitor requires from the host environment's event delivery.
///
/// `attach` is called once per enabled kind when monitoring starts, `detach`
/// symmetrically when it stops. Registration is assumed to always be
/// available in the host environment, so both are infallible.
pub trait SignalSource: Send {
    /// Begin delivering signals of `kind` into `tx`.
    fn attach(&mut self, kind: SignalKind, tx: SignalSender);

    /// Stop delivering signals of `kind`.
    fn detach(&mut self, kind: SignalKind);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_kind_mapping() {
        assert_eq!(Signal::PointerMove.kind(), SignalKind::PointerMove);
        assert_eq!(Signal::KeyPress.kind(), SignalKind::KeyPress);
        assert_eq!(Signal::Focus.kind(), SignalKind::Focus);
        assert_eq!(Signal::Blur.kind(), SignalKind::Blur);
        assert_eq!(
            Signal::VisibilityChange { hidden: true }.kind(),
            SignalKind::Visibility
        );
        assert_eq!(
            Signal::VisibilityChange { hidden: false }.kind(),
            SignalKind::Visibility
        );
    }
}
