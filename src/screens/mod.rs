//! Screen view models.
//! The frontend renders these as-is; they carry no behaviour beyond form
//! validation and shaping data for lists and cards.

pub mod create;
pub mod dashboard;
pub mod device_list;
pub mod queue;

use serde::{Deserialize, Serialize};

pub use create::{FormError, MessageForm};
pub use dashboard::{AppStats, BluetoothStatusView, DashboardView, StatCard};
pub use device_list::{DeviceAction, DeviceListView, DeviceRow};
pub use queue::{EmptyState, MessageQueueView, MessageRow};

/// Subtitle shown in every screen header.
pub const APP_SUBTITLE: &str = "Offline Bluetooth P2P Communication";

/// Navigation targets of the app's stack navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    MessageQueue,
    MessageCreate,
    Dashboard,
}

impl Route {
    /// Screen shown on launch.
    pub const INITIAL: Route = Route::MessageQueue;

    pub fn title(self) -> &'static str {
        match self {
            Route::MessageQueue => "Message Queue",
            Route::MessageCreate => "Create Message",
            Route::Dashboard => "Dashboard",
        }
    }

    /// Buttons in the screen's bottom navigation bar, left to right.
    pub fn nav_targets(self) -> [Route; 2] {
        match self {
            Route::MessageQueue => [Route::MessageCreate, Route::Dashboard],
            Route::MessageCreate => [Route::MessageQueue, Route::Dashboard],
            Route::Dashboard => [Route::MessageQueue, Route::MessageCreate],
        }
    }
}

/// A modal alert with a title and a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub title: &'static str,
    pub message: &'static str,
}
