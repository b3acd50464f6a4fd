use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {

    pub static ref CFG: HashMap<&'static str, String> = {
        let mut map = HashMap::new();

        map.insert(
            "ADDRESS",
            std::env::var("LOADER_WEB_ADDRESS").unwrap_or_else(|_| String::from("127.0.0.1")),
        );
        map.insert(
            "PORT",
            std::env::var("LOADER_WEB_PORT").unwrap_or_else(|_| String::from("8765")),
        );

        map
    };
}
