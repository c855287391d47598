use serde::Serialize;

use crate::core::bluetooth::{
    BleBackend, BluetoothConnectionStatus, BluetoothScanStatus, BluetoothService,
};
use crate::core::message::Message;
use crate::core::storage::{KeyValueStore, MessageStorage};
use crate::screens::{Route, APP_SUBTITLE};

/// Message counters shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStats {
    pub total_messages: usize,
    pub pending_messages: usize,
    pub urgent_messages: usize,
}

impl AppStats {
    pub fn from_messages(messages: &[Message]) -> Self {
        Self {
            total_messages: messages.len(),
            pending_messages: messages.iter().filter(|m| m.is_pending()).count(),
            urgent_messages: messages.iter().filter(|m| m.is_urgent()).count(),
        }
    }

    pub fn cards(&self) -> [StatCard; 3] {
        [
            StatCard { title: "Total Messages", value: self.total_messages, color: "#3498db" },
            StatCard { title: "Pending Messages", value: self.pending_messages, color: "#f39c12" },
            StatCard { title: "Urgent Messages", value: self.urgent_messages, color: "#e74c3c" },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub title: &'static str,
    pub value: usize,
    /// Accent colour of the card border.
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BluetoothStatusView {
    pub is_enabled: bool,
    pub connected_devices: usize,
    pub scan_status: BluetoothScanStatus,
    pub connection_status: BluetoothConnectionStatus,
}

impl BluetoothStatusView {
    pub async fn load<B: BleBackend>(service: &BluetoothService<B>) -> Self {
        Self {
            is_enabled: service.is_bluetooth_enabled().await,
            connected_devices: service.connected_devices().len(),
            scan_status: service.scan_status(),
            connection_status: service.connection_status(),
        }
    }

    pub fn enabled_label(&self) -> &'static str {
        if self.is_enabled { "Enabled" } else { "Disabled" }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub stats: AppStats,
    pub cards: [StatCard; 3],
    pub bluetooth: BluetoothStatusView,
    /// Quick action buttons.
    pub actions: [Route; 2],
    pub nav: [Route; 2],
}

impl DashboardView {
    pub fn new(stats: AppStats, bluetooth: BluetoothStatusView) -> Self {
        Self {
            title: Route::Dashboard.title(),
            subtitle: APP_SUBTITLE,
            cards: stats.cards(),
            stats,
            bluetooth,
            actions: [Route::MessageCreate, Route::MessageQueue],
            nav: Route::Dashboard.nav_targets(),
        }
    }

    pub async fn load<S: KeyValueStore, B: BleBackend>(
        storage: &MessageStorage<S>,
        service: &BluetoothService<B>,
    ) -> Self {
        let stats = AppStats::from_messages(&storage.get_messages().await);
        Self::new(stats, BluetoothStatusView::load(service).await)
    }
}
