pub mod simple_painter;
