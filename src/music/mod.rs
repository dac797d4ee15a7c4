// Note model: pitch classes, octaves, MIDI numbers, 12-TET frequencies

pub mod interval;
pub mod note;

pub use interval::{INTERVALS, Interval};
pub use note::{Note, NoteError, PitchClass, note_frequency};
