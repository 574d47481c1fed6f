pub mod server;

use secrecy::SecretString;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        platform_url: String,
        anon_key: SecretString,
        service_key: SecretString,
        site_url: String,
    },
}
