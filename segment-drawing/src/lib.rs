pub mod drawing;

pub mod panel;

pub mod segments;
