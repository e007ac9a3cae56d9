// Change tracking: detect what the tailoring step changed, render it as a
// change log and map it back onto lines of the editable text.

pub mod detector;
pub mod highlight;
pub mod render;
