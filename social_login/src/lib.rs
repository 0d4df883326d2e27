pub mod configuration;
mod naver;

pub use naver::NaverSocialLogin;
