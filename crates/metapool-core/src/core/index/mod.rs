//! Index barcode bookkeeping: combination tables, sequencer-specific i5
//! orientation, and sample-name scrubbing for demultiplexing.

pub mod combos;
pub mod names;
pub mod sequencer;
