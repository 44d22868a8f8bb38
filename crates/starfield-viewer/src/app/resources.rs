use bevy::prelude::Resource;
use crossbeam_channel::Receiver;

use crate::net::{FeedHandle, Incoming};

#[derive(Resource)]
pub struct NetRx(pub Receiver<Incoming>);

#[derive(Resource)]
pub struct Feed(pub FeedHandle);
