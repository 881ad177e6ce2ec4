pub mod guess_window;
