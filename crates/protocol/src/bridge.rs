use crate::{Chain, ContractError, CrossDomainMessage, Result};
use alloy::primitives::{Address, B256};
use sci_bindings::CrossDomainMessenger;
use tracing::{debug, instrument, warn};

/// What happened to a message handed to the destination messenger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayStatus {
    /// The target call succeeded.
    Relayed,
    /// The target call reverted. The message is recorded as failed on the
    /// destination and can be retried.
    Failed(ContractError),
    /// The destination messenger refused the relay transaction itself. When
    /// relayed through [`Bridge::relay_pending`] the message goes back into
    /// the origin outbox.
    Rejected(ContractError),
}

/// Outcome of relaying one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayOutcome {
    /// Message id.
    pub id: B256,
    /// The relayed message.
    pub message: CrossDomainMessage,
    /// Delivery status.
    pub status: RelayStatus,
}

impl RelayOutcome {
    /// True if the target call succeeded.
    pub const fn is_relayed(&self) -> bool {
        matches!(self.status, RelayStatus::Relayed)
    }
}

/// Off-chain relayer moving messages between a messenger pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Bridge {
    relayer: Address,
    origin_messenger: Address,
    destination_messenger: Address,
}

impl Bridge {
    /// Create a bridge relaying from `origin_messenger` to
    /// `destination_messenger` as `relayer`.
    pub const fn new(
        relayer: Address,
        origin_messenger: Address,
        destination_messenger: Address,
    ) -> Self {
        Self { relayer, origin_messenger, destination_messenger }
    }

    /// The relaying account.
    pub const fn relayer(&self) -> Address {
        self.relayer
    }

    /// Drain the origin outbox and relay every message on the destination,
    /// in dispatch order. Rejected messages are requeued on the origin.
    #[instrument(skip_all, fields(origin = origin.chain_id(), destination = destination.chain_id()))]
    pub fn relay_pending(
        &self,
        origin: &mut Chain,
        destination: &mut Chain,
    ) -> Result<Vec<RelayOutcome>> {
        let pending = origin.messenger_mut(self.origin_messenger)?.drain_outbox();
        debug!(count = pending.len(), "relaying pending messages");
        let outcomes: Vec<_> = pending.into_iter().map(|msg| self.relay(destination, msg)).collect();

        let rejected: Vec<_> = outcomes
            .iter()
            .filter(|o| matches!(o.status, RelayStatus::Rejected(_)))
            .map(|o| o.message.clone())
            .collect();
        if !rejected.is_empty() {
            debug!(count = rejected.len(), "requeueing rejected messages");
            origin.messenger_mut(self.origin_messenger)?.requeue(rejected);
        }
        Ok(outcomes)
    }

    /// Relay a single message on the destination chain.
    pub fn relay(&self, destination: &mut Chain, message: CrossDomainMessage) -> RelayOutcome {
        let id = message.id();
        let status = match destination.send(self.relayer, self.destination_messenger, &message.relay_call()) {
            Ok(receipt) if receipt.event::<CrossDomainMessenger::RelayedMessage>().is_some() => {
                RelayStatus::Relayed
            }
            Ok(_) => {
                let err = destination
                    .messenger(self.destination_messenger)
                    .ok()
                    .and_then(|m| m.failure(id).cloned())
                    .unwrap_or(ContractError::RelayNotRecorded(id));
                RelayStatus::Failed(err)
            }
            Err(err) => {
                warn!(%id, %err, "relay rejected");
                RelayStatus::Rejected(err)
            }
        };
        RelayOutcome { id, message, status }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ContractSpec;
    use alloy::primitives::Bytes;

    const RELAYER: Address = Address::repeat_byte(0xee);
    const SENDER: Address = Address::repeat_byte(0x01);

    #[test]
    fn relays_in_order_and_empties_outbox() {
        let mut l1 = Chain::new(11155111);
        let mut l2 = Chain::new(10);
        let origin = l1.deploy(RELAYER, ContractSpec::Messenger { relayer: RELAYER }).unwrap().address;
        let destination =
            l2.deploy(RELAYER, ContractSpec::Messenger { relayer: RELAYER }).unwrap().address;
        let bridge = Bridge::new(RELAYER, origin, destination);

        for _ in 0..2 {
            l1.send(
                SENDER,
                origin,
                &CrossDomainMessenger::sendMessageCall {
                    target: Address::repeat_byte(0x03),
                    message: Bytes::new(),
                    minGasLimit: 1,
                },
            )
            .unwrap();
        }

        let outcomes = bridge.relay_pending(&mut l1, &mut l2).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].message.nonce, 0);
        assert_eq!(outcomes[1].message.nonce, 1);
        // Nothing lives at the target on L2.
        assert!(outcomes.iter().all(|o| matches!(o.status, RelayStatus::Failed(_))));
        assert!(l1.messenger(origin).unwrap().outbox().is_empty());
        assert!(bridge.relay_pending(&mut l1, &mut l2).unwrap().is_empty());
    }

    #[test]
    fn rejected_messages_return_to_the_outbox() {
        let mut l1 = Chain::new(11155111);
        let mut l2 = Chain::new(10);
        let origin = l1.deploy(RELAYER, ContractSpec::Messenger { relayer: RELAYER }).unwrap().address;
        // The destination only accepts new messages from another relayer.
        let destination =
            l2.deploy(SENDER, ContractSpec::Messenger { relayer: SENDER }).unwrap().address;
        let bridge = Bridge::new(RELAYER, origin, destination);

        l1.send(
            SENDER,
            origin,
            &CrossDomainMessenger::sendMessageCall {
                target: Address::repeat_byte(0x03),
                message: Bytes::new(),
                minGasLimit: 1,
            },
        )
        .unwrap();

        let outcomes = bridge.relay_pending(&mut l1, &mut l2).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(
            outcomes[0].status,
            RelayStatus::Rejected(ContractError::OnlyRelayer { caller: RELAYER })
        );
        drop(outcomes);

        let outbox = l1.messenger(origin).unwrap().outbox();
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox[0].nonce, 0);

        // Another bridge with the right relayer picks it up.
        let outcomes = Bridge::new(SENDER, origin, destination).relay_pending(&mut l1, &mut l2).unwrap();
        assert!(matches!(outcomes[0].status, RelayStatus::Failed(_)));
        assert!(l1.messenger(origin).unwrap().outbox().is_empty());
    }
}
