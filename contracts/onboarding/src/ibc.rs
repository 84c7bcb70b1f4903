//! IBC entry points.
//!
//! The contract terminates ICS-20 channels. Every received packet goes through
//! the onboarding middleware wrapped around the transfer handler; the
//! acknowledgement written back is the transfer handler's.

#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    Deps, DepsMut, Env, Ibc3ChannelOpenResponse, IbcBasicResponse, IbcChannel, IbcChannelCloseMsg,
    IbcChannelConnectMsg, IbcChannelOpenMsg, IbcOrder, IbcPacketAckMsg, IbcPacketReceiveMsg,
    IbcPacketTimeoutMsg, IbcReceiveResponse, StdResult, Storage,
};

use common::ics20::ICS20_VERSION;
use common::{ConversionOutcome, Ics20Ack};

use crate::error::ContractError;
use crate::interceptor::{OnboardingMiddleware, Processed};
use crate::ledger::Bank;
use crate::liquidity::Pools;
use crate::params::get_params;
use crate::registrar::PairRegistry;
use crate::state::{ChannelInfo, Stats, CHANNELS, CONFIG, STATS};
use crate::transfer::TransferModule;

// ============================================================================
// Channel Management
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_channel_open(
    _deps: DepsMut,
    _env: Env,
    msg: IbcChannelOpenMsg,
) -> Result<Option<Ibc3ChannelOpenResponse>, ContractError> {
    validate_channel(msg.channel(), msg.counterparty_version())?;
    Ok(Some(Ibc3ChannelOpenResponse {
        version: ICS20_VERSION.to_string(),
    }))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_channel_connect(
    deps: DepsMut,
    _env: Env,
    msg: IbcChannelConnectMsg,
) -> Result<IbcBasicResponse, ContractError> {
    validate_channel(msg.channel(), msg.counterparty_version())?;

    let channel: IbcChannel = msg.into();
    let info = ChannelInfo {
        id: channel.endpoint.channel_id,
        counterparty_endpoint: channel.counterparty_endpoint,
        connection_id: channel.connection_id,
    };
    CHANNELS.save(deps.storage, &info.id, &info)?;

    Ok(IbcBasicResponse::new()
        .add_attribute("method", "ibc_channel_connect")
        .add_attribute("channel_id", info.id))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_channel_close(
    deps: DepsMut,
    _env: Env,
    msg: IbcChannelCloseMsg,
) -> Result<IbcBasicResponse, ContractError> {
    let channel: IbcChannel = msg.into();
    CHANNELS.remove(deps.storage, &channel.endpoint.channel_id);

    Ok(IbcBasicResponse::new()
        .add_attribute("method", "ibc_channel_close")
        .add_attribute("channel_id", channel.endpoint.channel_id))
}

/// ICS-20 channels are unordered and speak `ics20-1` on both ends.
fn validate_channel(
    channel: &IbcChannel,
    counterparty_version: Option<&str>,
) -> Result<(), ContractError> {
    if channel.order != IbcOrder::Unordered {
        return Err(ContractError::InvalidChannelOrder);
    }
    for version in std::iter::once(channel.version.as_str()).chain(counterparty_version) {
        if version != ICS20_VERSION {
            return Err(ContractError::InvalidChannelVersion {
                expected: ICS20_VERSION.to_string(),
                got: version.to_string(),
            });
        }
    }
    Ok(())
}

// ============================================================================
// Packets
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_packet_receive(
    deps: DepsMut,
    _env: Env,
    msg: IbcPacketReceiveMsg,
) -> Result<IbcReceiveResponse, ContractError> {
    // Nothing has been written yet, so these failures are safe to refund
    let middleware = match load_middleware(deps.as_ref()) {
        Ok(middleware) => middleware,
        Err(err) => {
            return Ok(IbcReceiveResponse::new()
                .set_ack(Ics20Ack::fail(err.to_string()).to_binary()?)
                .add_attribute("method", "ibc_packet_receive")
                .add_attribute("success", "false"));
        }
    };

    let Processed {
        receipt, outcome, ..
    } = middleware.process(deps.storage, deps.api, &msg.packet);

    // The pipeline has committed; the ack must stay the transfer handler's
    let success = receipt.ack.is_success();
    let stats_recorded = record_stats(deps.storage, success, &outcome).is_ok();

    Ok(IbcReceiveResponse::new()
        .set_ack(receipt.ack.to_binary()?)
        .add_events(receipt.events)
        .add_attribute("method", "ibc_packet_receive")
        .add_attribute("success", success.to_string())
        .add_attribute("onboarded", outcome.succeeded.to_string())
        .add_attribute("stats_recorded", stats_recorded.to_string()))
}

type Middleware = OnboardingMiddleware<TransferModule<Bank>, Pools<Bank>, PairRegistry, Bank>;

fn load_middleware(deps: Deps) -> StdResult<Middleware> {
    let config = CONFIG.load(deps.storage)?;
    let params = get_params(deps.storage)?.params;

    Ok(OnboardingMiddleware {
        transfer: TransferModule::new(Bank),
        liquidity: Pools::new(config.native_denom.clone(), Bank),
        registry: PairRegistry,
        ledger: Bank,
        params,
        native_denom: config.native_denom,
        fee_collector: config.fee_collector,
    })
}

fn record_stats(
    storage: &mut dyn Storage,
    success: bool,
    outcome: &ConversionOutcome,
) -> StdResult<Stats> {
    STATS.update(storage, |mut stats| -> StdResult<_> {
        if success {
            stats.total_packets_received += 1;
        } else {
            stats.total_packets_failed += 1;
        }
        if outcome.succeeded {
            stats.total_onboarded += 1;
            stats.total_native_credited += outcome.native_amount_credited;
        }
        Ok(stats)
    })
}

/// No packets are sent, so no acknowledgement is ever expected.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_packet_ack(
    _deps: DepsMut,
    _env: Env,
    _msg: IbcPacketAckMsg,
) -> Result<IbcBasicResponse, ContractError> {
    Ok(IbcBasicResponse::new().add_attribute("method", "ibc_packet_ack"))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn ibc_packet_timeout(
    _deps: DepsMut,
    _env: Env,
    _msg: IbcPacketTimeoutMsg,
) -> Result<IbcBasicResponse, ContractError> {
    Ok(IbcBasicResponse::new().add_attribute("method", "ibc_packet_timeout"))
}
