pub mod scramble;
pub mod sequencer;
pub mod sound;
