use alloy::primitives::{Address, B256};
use sci_bindings::{labelhash, namehash, Ens};
use sci_protocol::{Chain, ContractSpec};

/// An ENS registry where `eth` and `a.eth` belong to the deployer, as on a
/// freshly set-up local node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnsFixture {
    /// The ENS registry.
    pub ens: Address,
    /// Owner of the root node.
    pub deployer: Address,
}

impl EnsFixture {
    /// Deploy the registry and assign the `eth` and `a.eth` nodes.
    pub fn setup(chain: &mut Chain, deployer: Address) -> Self {
        let ens = chain.deploy(deployer, ContractSpec::EnsRegistry).unwrap().address;
        let fixture = Self { ens, deployer };
        fixture.set_subnode_owner(chain, B256::ZERO, "eth", deployer);
        fixture.set_subnode_owner(chain, namehash("eth"), "a", deployer);
        fixture
    }

    /// Give `label` under `parent` to `owner`, acting as the deployer.
    pub fn set_subnode_owner(&self, chain: &mut Chain, parent: B256, label: &str, owner: Address) {
        let call = Ens::setSubnodeOwnerCall { node: parent, label: labelhash(label), owner };
        chain.send(self.deployer, self.ens, &call).unwrap();
    }

    /// Give the name `<label>.<parent>` to `owner`. The deployer must own
    /// `parent`.
    pub fn assign(&self, chain: &mut Chain, name: &str, owner: Address) -> B256 {
        let (label, parent) = name.split_once('.').unwrap_or((name, ""));
        self.set_subnode_owner(chain, namehash(parent), label, owner);
        namehash(name)
    }

    /// Owner of `name` according to the registry.
    pub fn owner(&self, chain: &Chain, name: &str) -> Address {
        chain.ens_registry(self.ens).unwrap().owner(namehash(name))
    }
}
