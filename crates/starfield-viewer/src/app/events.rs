use bevy::prelude::Event;
use starfield_core::ItemId;

#[derive(Event, Debug, Clone)]
pub struct ItemHovered(pub Option<ItemId>);

#[derive(Event, Debug, Clone)]
pub struct ItemSelected(pub ItemId);

#[derive(Event, Debug, Clone)]
pub struct RecordInteraction(pub ItemId);
