pub use self::http::HTTP;

mod http;
