//! Tests for the process-wide convenience wrapper.
//!
//! The wrapper owns process-global state, so the whole lifecycle runs in a
//! single test, in order: precondition errors, configure, detect, bridged
//! notifications, replay.

mod common;

use std::time::Duration;

use common::TestSource;
use tokio::time::sleep;
use vigil::global::{self, UserNotification};
use vigil::{ActivityState, MonitorConfig, MonitorError};

#[tokio::test(start_paused = true)]
async fn wrapper_lifecycle() {
    common::init_tracing();

    // Every accessor fails before configure()/detect().
    assert!(matches!(
        global::replay_state(),
        Err(MonitorError::NotConfigured)
    ));
    assert!(matches!(global::state(), Err(MonitorError::NotConfigured)));
    assert!(matches!(
        global::on(vigil::MonitorEvent::Active, || {}),
        Err(MonitorError::NotConfigured)
    ));
    assert!(matches!(
        global::notifications(),
        Err(MonitorError::NotDetecting)
    ));

    let source = TestSource::default();
    let monitor = global::configure(
        MonitorConfig {
            inactive_after_secs: 2,
            ..MonitorConfig::default()
        },
        source.clone(),
    );
    assert_eq!(monitor.state(), ActivityState::Unknown);
    assert_eq!(global::state().unwrap(), ActivityState::Unknown);

    // Configured but not yet detecting.
    assert!(global::notifications().is_err());

    // detect() keeps the first configuration; this second source is unused.
    assert!(global::detect(TestSource::default()));
    let mut notifications = global::notifications().unwrap();

    sleep(Duration::from_millis(1100)).await;
    assert_eq!(global::state().unwrap(), ActivityState::Active);
    assert_eq!(
        notifications.try_recv().unwrap(),
        UserNotification::UserActive
    );

    sleep(Duration::from_millis(1000)).await;
    assert_eq!(global::state().unwrap(), ActivityState::Inactive);
    assert_eq!(
        notifications.try_recv().unwrap(),
        UserNotification::UserInactive
    );

    // Replay re-broadcasts the current state to the bridged channel.
    global::replay_state().unwrap();
    assert_eq!(
        notifications.try_recv().unwrap(),
        UserNotification::UserInactive
    );

    // detect() is idempotent.
    assert!(global::detect(TestSource::default()));
    assert_eq!(global::state().unwrap(), ActivityState::Inactive);
}
