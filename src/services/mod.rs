// HubDeck services
// Services resolve and fetch resources, drive embedded-service lifecycles and load settings.

pub mod embed_controller;
pub mod file_resolver;
pub mod resource_resolver;
pub mod resource_service;
pub mod settings_engine;
