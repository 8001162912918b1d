/// Gas limit requested for a relayed `registerDomain` call.
pub const REGISTER_DOMAIN_GAS_LIMIT: u32 = 1_000_000;

/// Gas limit requested for a relayed `registerDomainWithVerifier` call. Higher
/// than [`REGISTER_DOMAIN_GAS_LIMIT`] as the destination also stores the
/// verifier.
pub const REGISTER_DOMAIN_WITH_VERIFIER_GAS_LIMIT: u32 = 1_500_000;

/// Gas limits attached to cross-domain registration messages.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayGasLimits {
    /// Limit for `registerDomain`.
    pub register_domain: u32,
    /// Limit for `registerDomainWithVerifier`.
    pub register_domain_with_verifier: u32,
}

impl Default for RelayGasLimits {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayGasLimits {
    /// The default limits.
    pub const fn new() -> Self {
        Self {
            register_domain: REGISTER_DOMAIN_GAS_LIMIT,
            register_domain_with_verifier: REGISTER_DOMAIN_WITH_VERIFIER_GAS_LIMIT,
        }
    }

    /// Override the `registerDomain` limit.
    pub const fn with_register_domain(mut self, limit: u32) -> Self {
        self.register_domain = limit;
        self
    }

    /// Override the `registerDomainWithVerifier` limit.
    pub const fn with_register_domain_with_verifier(mut self, limit: u32) -> Self {
        self.register_domain_with_verifier = limit;
        self
    }

    /// The limit for the given call variant.
    pub const fn for_variant(&self, with_verifier: bool) -> u32 {
        if with_verifier {
            self.register_domain_with_verifier
        } else {
            self.register_domain
        }
    }
}
