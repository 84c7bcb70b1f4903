//! Packet interceptor.
//!
//! `OnboardingMiddleware` wraps a `PacketReceiver` (the transfer handler) and
//! runs the onboarding step after it credited the transfer:
//!
//! ```text
//! Received -> Credited -> EligibilityChecked -> Converted | Skipped -> Acknowledged
//!          \-> Acknowledged                          (transfer handler failed)
//! ```
//!
//! The acknowledgement returned is always the wrapped handler's, untouched.
//! The onboarding result travels separately as `Processed::outcome` and as
//! an `onboarding` event.

use cosmwasm_std::{Addr, Api, Event, IbcPacket, Storage};

use common::{ConversionOutcome, InboundTransfer, OnboardingErrorKind, Params, TokenPair};

use crate::cache::StorageTransaction;
use crate::conversion::ConversionEngine;
use crate::eligibility::{evaluate, ReceiverView};
use crate::ledger::Ledger;
use crate::liquidity::Liquidity;
use crate::registrar::{ensure_pair, TokenRegistry};
use crate::transfer::{PacketReceiver, Receipt};

/// Event carrying the onboarding outcome of a packet
pub const ONBOARDING_EVENT: &str = "onboarding";

/// Event emitted when a packet caused a token pair to be created
pub const PAIR_REGISTERED_EVENT: &str = "token_pair_registered";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketState {
    Received,
    Credited,
    EligibilityChecked,
    Converted,
    Skipped,
    Acknowledged,
}

/// Result of running one packet through the middleware
#[derive(Clone, Debug, PartialEq)]
pub struct Processed {
    /// Receipt of the wrapped handler, with the onboarding events appended
    pub receipt: Receipt,
    pub outcome: ConversionOutcome,
    /// Pair created for this packet, if any
    pub registered: Option<TokenPair>,
    /// States visited, in order
    pub trace: Vec<PacketState>,
}

pub struct OnboardingMiddleware<T, L, R, G> {
    pub transfer: T,
    pub liquidity: L,
    pub registry: R,
    pub ledger: G,
    /// Snapshot taken once for the packet
    pub params: Params,
    pub native_denom: String,
    pub fee_collector: Addr,
}

impl<T, L, R, G> OnboardingMiddleware<T, L, R, G>
where
    T: PacketReceiver,
    L: Liquidity,
    R: TokenRegistry,
    G: Ledger,
{
    pub fn process(
        &self,
        storage: &mut dyn Storage,
        api: &dyn Api,
        packet: &IbcPacket,
    ) -> Processed {
        let mut trace = vec![PacketState::Received];
        let mut receipt = self.transfer.on_recv_packet(storage, api, packet);

        let credited = receipt
            .transfer
            .clone()
            .filter(|_| receipt.ack.is_success());
        let transfer = match credited {
            Some(transfer) => transfer,
            None => {
                trace.push(PacketState::Acknowledged);
                return Processed {
                    receipt,
                    outcome: ConversionOutcome::skipped(Some(
                        OnboardingErrorKind::UnderlyingTransferFailed,
                    )),
                    registered: None,
                    trace,
                };
            }
        };
        trace.push(PacketState::Credited);

        let (outcome, registered) = self.onboard(storage, &transfer, &mut trace);
        trace.push(PacketState::Acknowledged);

        receipt.events.push(onboarding_event(&transfer, &outcome));
        if let Some(pair) = &registered {
            receipt.events.push(
                Event::new(PAIR_REGISTERED_EVENT)
                    .add_attribute("denom", &pair.denom)
                    .add_attribute("contract_address", &pair.contract_address),
            );
        }

        Processed {
            receipt,
            outcome,
            registered,
            trace,
        }
    }

    fn onboard(
        &self,
        storage: &mut dyn Storage,
        transfer: &InboundTransfer,
        trace: &mut Vec<PacketState>,
    ) -> (ConversionOutcome, Option<TokenPair>) {
        // An unreadable registry entry is left for the registrar to report
        let view = ReceiverView {
            pair: self
                .registry
                .get_pair(storage, &transfer.denom)
                .ok()
                .flatten(),
            may_register: self.registry.may_register(&self.params, &transfer.denom),
            native_balance: self
                .ledger
                .balance(storage, &transfer.receiver, &self.native_denom)
                .unwrap_or_default(),
        };

        let decision = evaluate(&self.params, transfer, &view);
        trace.push(PacketState::EligibilityChecked);
        if !decision.eligible {
            trace.push(PacketState::Skipped);
            return (ConversionOutcome::skipped(decision.reason), None);
        }

        let mut tx = StorageTransaction::new(storage);
        let registration = match ensure_pair(&self.registry, &mut tx, &self.params, &transfer.denom)
        {
            Ok(registration) => {
                tx.commit();
                registration
            }
            Err(reason) => {
                tx.rollback();
                trace.push(PacketState::Skipped);
                return (ConversionOutcome::failed(reason), None);
            }
        };

        let engine = ConversionEngine {
            liquidity: &self.liquidity,
            ledger: &self.ledger,
            strategy: &self.params.swap_policy,
            native_denom: &self.native_denom,
            fee_collector: &self.fee_collector,
        };
        let outcome = engine.convert(
            storage,
            &self.params,
            &transfer.receiver,
            &transfer.denom,
            transfer.amount,
            Some(&registration.pair),
        );
        trace.push(PacketState::Converted);

        let registered = registration.created.then_some(registration.pair);
        (outcome, registered)
    }
}

impl<T, L, R, G> PacketReceiver for OnboardingMiddleware<T, L, R, G>
where
    T: PacketReceiver,
    L: Liquidity,
    R: TokenRegistry,
    G: Ledger,
{
    fn on_recv_packet(
        &self,
        storage: &mut dyn Storage,
        api: &dyn Api,
        packet: &IbcPacket,
    ) -> Receipt {
        self.process(storage, api, packet).receipt
    }
}

fn onboarding_event(transfer: &InboundTransfer, outcome: &ConversionOutcome) -> Event {
    Event::new(ONBOARDING_EVENT)
        .add_attribute("packet_sequence", transfer.sequence.to_string())
        .add_attribute("channel", &transfer.source_channel)
        .add_attribute("receiver", transfer.receiver.as_str())
        .add_attribute("denom", &transfer.denom)
        .add_attribute("amount", transfer.amount)
        .add_attribute("attempted", outcome.attempted.to_string())
        .add_attribute("succeeded", outcome.succeeded.to_string())
        .add_attribute("native_amount_credited", outcome.native_amount_credited)
        .add_attribute("source_amount_debited", outcome.source_amount_debited)
        .add_attribute("fee_amount", outcome.fee_amount)
        .add_attribute("token_amount_converted", outcome.token_amount_converted)
        .add_attribute(
            "reason",
            outcome.reason.map(|r| r.as_str()).unwrap_or("none"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Bank;
    use crate::liquidity::Pools;
    use crate::registrar::PairRegistry;
    use crate::state::{ChannelInfo, Pool, CHANNELS, POOLS};
    use crate::transfer::TransferModule;
    use common::{FungibleTokenPacketData, Ics20Ack, SwapPolicy};
    use cosmwasm_std::testing::{MockApi, MockStorage};
    use cosmwasm_std::{to_json_binary, IbcEndpoint, IbcTimeout, Timestamp, Uint128};

    const NATIVE: &str = "aalthea";
    const VOUCHER: &str = "ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2";

    type Middleware = OnboardingMiddleware<TransferModule<Bank>, Pools<Bank>, PairRegistry, Bank>;

    fn middleware(params: Params) -> Middleware {
        OnboardingMiddleware {
            transfer: TransferModule::new(Bank),
            liquidity: Pools::new(NATIVE, Bank),
            registry: PairRegistry,
            ledger: Bank,
            params,
            native_denom: NATIVE.to_string(),
            fee_collector: Addr::unchecked("althea1collector"),
        }
    }

    fn receiver() -> Addr {
        Addr::unchecked("althea1receiver")
    }

    fn endpoint(channel: &str) -> IbcEndpoint {
        IbcEndpoint {
            port_id: "transfer".to_string(),
            channel_id: channel.to_string(),
        }
    }

    fn setup() -> MockStorage {
        let mut store = MockStorage::new();
        CHANNELS
            .save(
                &mut store,
                "channel-0",
                &ChannelInfo {
                    id: "channel-0".to_string(),
                    counterparty_endpoint: endpoint("channel-7"),
                    connection_id: "connection-0".to_string(),
                },
            )
            .unwrap();
        POOLS
            .save(
                &mut store,
                VOUCHER,
                &Pool {
                    denom: VOUCHER.to_string(),
                    source_reserve: Uint128::new(1_000_000_000_000),
                    native_reserve: Uint128::new(1_000_000_000_000_000_000_000),
                },
            )
            .unwrap();
        store
    }

    fn packet(amount: &str, receiver: &str) -> IbcPacket {
        let data = FungibleTokenPacketData {
            denom: "uatom".to_string(),
            amount: amount.to_string(),
            sender: "cosmos1sender".to_string(),
            receiver: receiver.to_string(),
            memo: None,
        };
        IbcPacket::new(
            to_json_binary(&data).unwrap(),
            endpoint("channel-7"),
            endpoint("channel-0"),
            1,
            IbcTimeout::with_timestamp(Timestamp::from_seconds(1_000)),
        )
    }

    fn onboarding_params() -> Params {
        Params {
            enable_onboarding: true,
            whitelisted_channels: vec!["channel-0".to_string()],
            auto_register_pairs: true,
            ..Params::default()
        }
    }

    #[test]
    fn test_eligible_packet_converts() {
        let mut store = setup();
        let api = MockApi::default();
        let mw = middleware(onboarding_params());

        let processed = mw.process(&mut store, &api, &packet("10000000000", "althea1receiver"));
        assert_eq!(processed.receipt.ack, Ics20Ack::success());
        assert_eq!(
            processed.trace,
            vec![
                PacketState::Received,
                PacketState::Credited,
                PacketState::EligibilityChecked,
                PacketState::Converted,
                PacketState::Acknowledged,
            ]
        );
        assert!(processed.outcome.succeeded);
        assert!(
            processed.outcome.native_amount_credited
                <= Uint128::new(common::onboarding::DEFAULT_AUTO_SWAP_THRESHOLD)
        );
        assert_eq!(
            Bank.balance(&store, &receiver(), NATIVE).unwrap(),
            processed.outcome.native_amount_credited
        );
        assert_eq!(
            Bank.balance(&store, &receiver(), VOUCHER).unwrap(),
            Uint128::new(10_000_000_000) - processed.outcome.source_amount_debited
        );

        let registered = processed.registered.unwrap();
        assert_eq!(registered.denom, VOUCHER);
        let kinds: Vec<&str> = processed
            .receipt
            .events
            .iter()
            .map(|e| e.ty.as_str())
            .collect();
        assert_eq!(
            kinds,
            vec!["fungible_token_packet", "onboarding", "token_pair_registered"]
        );
    }

    #[test]
    fn test_ineligible_packet_is_skipped() {
        let mut store = setup();
        let api = MockApi::default();
        let mw = middleware(Params {
            whitelisted_channels: vec!["channel-5".to_string()],
            ..onboarding_params()
        });

        let processed = mw.process(&mut store, &api, &packet("10000000000", "althea1receiver"));
        assert_eq!(processed.receipt.ack, Ics20Ack::success());
        assert_eq!(processed.trace[3], PacketState::Skipped);
        assert_eq!(
            processed.outcome,
            ConversionOutcome::skipped(Some(OnboardingErrorKind::ChannelNotWhitelisted))
        );
        assert!(Bank.balance(&store, &receiver(), NATIVE).unwrap().is_zero());
        assert_eq!(
            Bank.balance(&store, &receiver(), VOUCHER).unwrap(),
            Uint128::new(10_000_000_000)
        );
    }

    #[test]
    fn test_failed_transfer_is_not_onboarded() {
        let mut store = setup();
        let api = MockApi::default();
        let mw = middleware(onboarding_params());

        let processed = mw.process(&mut store, &api, &packet("0", "althea1receiver"));
        assert!(!processed.receipt.ack.is_success());
        assert_eq!(
            processed.trace,
            vec![PacketState::Received, PacketState::Acknowledged]
        );
        assert!(!processed.outcome.attempted);
        assert_eq!(
            processed.outcome.reason,
            Some(OnboardingErrorKind::UnderlyingTransferFailed)
        );
        assert_eq!(processed.receipt.events.len(), 1);
    }

    #[test]
    fn test_funded_receiver_skips_registration() {
        let mut store = setup();
        let api = MockApi::default();
        let mw = middleware(Params {
            swap_policy: SwapPolicy::TopUp {
                threshold: Uint128::new(1),
            },
            ..onboarding_params()
        });
        Bank.credit(&mut store, &receiver(), NATIVE, Uint128::new(1))
            .unwrap();

        let processed = mw.process(&mut store, &api, &packet("500", "althea1receiver"));
        assert_eq!(
            processed.outcome.reason,
            Some(OnboardingErrorKind::ReceiverFunded)
        );
        assert!(processed.registered.is_none());
        assert_eq!(
            Bank.balance(&store, &receiver(), VOUCHER).unwrap(),
            Uint128::new(500)
        );
    }

    #[test]
    fn test_middleware_is_a_packet_receiver() {
        fn receive(rx: &impl PacketReceiver, store: &mut MockStorage, packet: &IbcPacket) -> Receipt {
            rx.on_recv_packet(store, &MockApi::default(), packet)
        }

        let mut store = setup();
        let mw = middleware(Params::default());
        let receipt = receive(&mw, &mut store, &packet("10", "althea1receiver"));
        assert_eq!(receipt.ack, Ics20Ack::success());
        assert_eq!(
            receipt.transfer.map(|t| t.amount),
            Some(Uint128::new(10))
        );
    }
}
