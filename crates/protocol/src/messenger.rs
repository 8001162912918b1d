use crate::{chain::unknown_selector, CallContext, Chain, ContractError, Result};
use alloy::{
    primitives::{Address, Bytes, B256, U256},
    sol_types::{SolInterface, SolValue},
};
use sci_bindings::{
    hash_cross_domain_message,
    CrossDomainMessenger::{self, CrossDomainMessengerCalls},
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// A message dispatched by a messenger, waiting to be relayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossDomainMessage {
    /// Per-messenger sequence number.
    pub nonce: u64,
    /// The contract that dispatched the message on the origin chain.
    pub sender: Address,
    /// The contract to call on the destination chain.
    pub target: Address,
    /// Calldata for `target`.
    pub message: Bytes,
    /// Gas requested for the destination call.
    pub gas_limit: u64,
}

impl CrossDomainMessage {
    /// The message id, as tracked by the destination messenger.
    pub fn id(&self) -> B256 {
        hash_cross_domain_message(self.nonce, self.sender, self.target, self.gas_limit, &self.message)
    }

    /// The `relayMessage` call delivering this message.
    pub fn relay_call(&self) -> CrossDomainMessenger::relayMessageCall {
        CrossDomainMessenger::relayMessageCall {
            nonce: U256::from(self.nonce),
            sender: self.sender,
            target: self.target,
            value: U256::ZERO,
            minGasLimit: U256::from(self.gas_limit),
            message: self.message.clone(),
        }
    }
}

/// One end of an OP-style messenger pair.
///
/// On the origin chain it is an outbound queue: `sendMessage` appends to the
/// outbox and returns immediately. On the destination chain it delivers
/// messages with `relayMessage`, exposing the origin sender through
/// `xDomainMessageSender` for the duration of the call. A message that
/// succeeded once can never be relayed again. A failed message is recorded
/// and may be retried by anyone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messenger {
    relayer: Address,
    nonce: u64,
    outbox: Vec<CrossDomainMessage>,
    x_domain_sender: Option<Address>,
    successful: BTreeSet<B256>,
    failed: BTreeMap<B256, ContractError>,
}

impl Messenger {
    /// Create a messenger whose new messages are relayed by `relayer`.
    pub const fn new(relayer: Address) -> Self {
        Self {
            relayer,
            nonce: 0,
            outbox: Vec::new(),
            x_domain_sender: None,
            successful: BTreeSet::new(),
            failed: BTreeMap::new(),
        }
    }

    /// The account allowed to relay new messages.
    pub const fn relayer(&self) -> Address {
        self.relayer
    }

    /// Nonce of the next dispatched message.
    pub const fn message_nonce(&self) -> u64 {
        self.nonce
    }

    /// Messages dispatched but not yet handed to a bridge.
    pub fn outbox(&self) -> &[CrossDomainMessage] {
        &self.outbox
    }

    /// Sender of the message being relayed, if any.
    pub const fn x_domain_sender(&self) -> Option<Address> {
        self.x_domain_sender
    }

    /// True if the message was relayed successfully.
    pub fn is_successful(&self, id: B256) -> bool {
        self.successful.contains(&id)
    }

    /// The error a failed message raised on its last relay attempt.
    pub fn failure(&self, id: B256) -> Option<&ContractError> {
        self.failed.get(&id)
    }

    /// Enqueue a message and return its id.
    pub fn send(&mut self, sender: Address, target: Address, message: Bytes, gas_limit: u64) -> B256 {
        let msg = CrossDomainMessage { nonce: self.nonce, sender, target, message, gas_limit };
        self.nonce += 1;
        let id = msg.id();
        self.outbox.push(msg);
        id
    }

    /// Take every queued message, oldest first.
    pub fn drain_outbox(&mut self) -> Vec<CrossDomainMessage> {
        std::mem::take(&mut self.outbox)
    }

    /// Put messages back at the front of the outbox, ahead of anything
    /// dispatched since they were drained.
    pub fn requeue(&mut self, messages: impl IntoIterator<Item = CrossDomainMessage>) {
        let newer = std::mem::replace(&mut self.outbox, messages.into_iter().collect());
        self.outbox.extend(newer);
    }
}

pub(crate) fn execute(chain: &mut Chain, ctx: CallContext, input: &[u8]) -> Result<Bytes> {
    let call =
        CrossDomainMessengerCalls::abi_decode(input).map_err(|_| unknown_selector(ctx, input))?;

    match call {
        CrossDomainMessengerCalls::sendMessage(c) => {
            let messenger = chain.messenger_mut(ctx.address)?;
            let nonce = messenger.nonce;
            let gas_limit = u64::from(c.minGasLimit);
            let id = messenger.send(ctx.caller, c.target, c.message.clone(), gas_limit);
            debug!(%id, nonce, sender = %ctx.caller, target = %c.target, "message dispatched");
            chain.emit(
                ctx.address,
                &CrossDomainMessenger::SentMessage {
                    target: c.target,
                    sender: ctx.caller,
                    message: c.message,
                    messageNonce: U256::from(nonce),
                    gasLimit: U256::from(gas_limit),
                },
            );
            Ok(Bytes::new())
        }
        CrossDomainMessengerCalls::relayMessage(c) => {
            // The id covers the full call, so out-of-range nonces stay distinct.
            let id = c.message_hash();
            relay(chain, ctx, id, c.sender, c.target, &c.message)
        }
        CrossDomainMessengerCalls::xDomainMessageSender(_) => {
            let sender = chain.messenger(ctx.address)?.x_domain_sender;
            Ok(sender.ok_or(ContractError::SenderNotSet)?.abi_encode().into())
        }
        CrossDomainMessengerCalls::successfulMessages(c) => {
            Ok(chain.messenger(ctx.address)?.is_successful(c.msgHash).abi_encode().into())
        }
        CrossDomainMessengerCalls::failedMessages(c) => {
            Ok(chain.messenger(ctx.address)?.failed.contains_key(&c.msgHash).abi_encode().into())
        }
    }
}

fn relay(
    chain: &mut Chain,
    ctx: CallContext,
    id: B256,
    sender: Address,
    target: Address,
    message: &[u8],
) -> Result<Bytes> {
    let messenger = chain.messenger_mut(ctx.address)?;
    if messenger.successful.contains(&id) {
        return Err(ContractError::MessageAlreadyRelayed(id));
    }
    if !messenger.failed.contains_key(&id) && ctx.caller != messenger.relayer {
        return Err(ContractError::OnlyRelayer { caller: ctx.caller });
    }
    let outer_sender = messenger.x_domain_sender.replace(sender);

    let res = chain.call(ctx.address, target, message);

    let messenger = chain.messenger_mut(ctx.address)?;
    messenger.x_domain_sender = outer_sender;
    match res {
        Ok(_) => {
            messenger.failed.remove(&id);
            messenger.successful.insert(id);
            debug!(%id, %target, "message relayed");
            chain.emit(ctx.address, &CrossDomainMessenger::RelayedMessage { msgHash: id });
        }
        Err(err) => {
            warn!(%id, %target, %err, "relayed message failed");
            messenger.failed.insert(id, err);
            chain.emit(ctx.address, &CrossDomainMessenger::FailedRelayedMessage { msgHash: id });
        }
    }
    Ok(Bytes::new())
}
