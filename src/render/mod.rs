pub(crate) mod background;
pub(crate) mod canvas;
pub(crate) mod compositor;
pub(crate) mod pipeline;
