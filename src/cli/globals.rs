use secrecy::SecretString;

#[derive(Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub api_token: SecretString,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            api_token: SecretString::default(),
        }
    }

    pub fn set_token(&mut self, token: SecretString) {
        self.api_token = token;
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("api_url", &self.api_url)
            .field("api_token", &"***")
            .finish()
    }
}
