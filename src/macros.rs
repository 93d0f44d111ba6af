// src/macros.rs
#[macro_export]
macro_rules! s {
    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Anything with `String: From<_>`
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! join {
    // Concatenate &str-likes into a fresh String
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut s = ::std::string::String::from($first);
        $(
            s.push_str($rest);
        )+
        s
    }};
}
