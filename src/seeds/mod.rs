pub mod sample_user_seed;
