use alloy::primitives::{Address, Bytes};
use sci_protocol::{Chain, ContractError, ContractSpec, Deployed, Receipt};

/// A chain deployments can be applied to.
pub trait DeploymentTarget {
    /// The chain id, selecting the deployment state directory.
    fn chain_id(&self) -> u64;

    /// Deploy a contract from `from`.
    fn deploy_contract(&mut self, from: Address, spec: ContractSpec) -> Result<Deployed, ContractError>;

    /// Send a transaction from `from`.
    fn send_transaction(
        &mut self,
        from: Address,
        to: Address,
        data: Bytes,
    ) -> Result<Receipt, ContractError>;

    /// True if a contract is deployed at `address`.
    fn has_code(&self, address: Address) -> bool;
}

impl DeploymentTarget for Chain {
    fn chain_id(&self) -> u64 {
        Self::chain_id(self)
    }

    fn deploy_contract(&mut self, from: Address, spec: ContractSpec) -> Result<Deployed, ContractError> {
        self.deploy(from, spec)
    }

    fn send_transaction(
        &mut self,
        from: Address,
        to: Address,
        data: Bytes,
    ) -> Result<Receipt, ContractError> {
        self.transact(from, to, data)
    }

    fn has_code(&self, address: Address) -> bool {
        Self::has_code(self, address)
    }
}

impl<T: DeploymentTarget + ?Sized> DeploymentTarget for &mut T {
    fn chain_id(&self) -> u64 {
        (**self).chain_id()
    }

    fn deploy_contract(&mut self, from: Address, spec: ContractSpec) -> Result<Deployed, ContractError> {
        (**self).deploy_contract(from, spec)
    }

    fn send_transaction(
        &mut self,
        from: Address,
        to: Address,
        data: Bytes,
    ) -> Result<Receipt, ContractError> {
        (**self).send_transaction(from, to, data)
    }

    fn has_code(&self, address: Address) -> bool {
        (**self).has_code(address)
    }
}
