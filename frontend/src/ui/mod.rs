pub mod cards;
pub mod confirm;
pub mod dashboard;
pub mod modals;
pub mod network;
pub mod notification;
pub mod settings;
pub mod topology;
pub mod topology_layout;
