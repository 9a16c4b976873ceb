pub mod ken_burns;
