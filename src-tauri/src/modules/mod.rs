// Module exports for pure logic
pub mod navigation;
pub mod devtools;
pub mod layout;              // Window geometry
pub mod menu;                // Menu item ids
pub mod page;                // Page bridge scripts and snapshots
pub mod tabs;                // Tab strip logic
