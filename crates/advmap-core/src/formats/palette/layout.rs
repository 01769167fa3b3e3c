pub const COLOR_SIZE: usize = 4;

pub const RED_OFFSET: usize = 0;
pub const GREEN_OFFSET: usize = 1;
pub const BLUE_OFFSET: usize = 2;
