//! Line source adapters: live git, cassette recording, cassette replay.

pub mod live;
pub mod recording;
pub mod replaying;
