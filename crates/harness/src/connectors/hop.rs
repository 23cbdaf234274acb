//! Hop connector spells and `TransferSent` lookups.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, B256, U256},
    providers::Provider,
    rpc::types::Filter,
    sol_types::SolEvent,
};
use dsa_contracts::{connectors::IConnectV2Hop, protocols::IHopL2Bridge};
use tracing::debug;

use crate::{
    error::{HarnessError, Result},
    fork::ForkNode,
    retry::with_retry,
    spells::Spell,
};

/// Deadline offset used for both the source swap and the destination swap.
pub const DEFAULT_DEADLINE_OFFSET: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Reference gas price the bonder fee is estimated with, 100 gwei.
pub const REFERENCE_GAS_PRICE_WEI: u128 = 100_000_000_000;

/// Reference gas limit of the bonder's transaction on the destination.
pub const REFERENCE_GAS_LIMIT: u64 = 150_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeParams {
    pub token: Address,
    /// AMM wrapper the connector routes through.
    pub hop_router: Address,
    pub recipient: Address,
    pub target_chain_id: u64,
    pub amount: U256,
    pub bonder_fee: U256,
    pub source_amount_out_min: U256,
    /// Unix seconds.
    pub source_deadline: U256,
    pub destination_amount_out_min: U256,
    /// Unix seconds.
    pub destination_deadline: U256,
}

impl BridgeParams {
    pub fn to_sol(&self) -> IConnectV2Hop::BridgeParams {
        IConnectV2Hop::BridgeParams {
            token: self.token,
            hopRouter: self.hop_router,
            recipient: self.recipient,
            targetChainId: U256::from(self.target_chain_id),
            amount: self.amount,
            bonderFee: self.bonder_fee,
            sourceAmountOutMin: self.source_amount_out_min,
            sourceDeadline: self.source_deadline,
            destinationAmountOutMin: self.destination_amount_out_min,
            destinationDeadline: self.destination_deadline,
        }
    }

    /// The params as the connector's tuple argument.
    pub fn to_dyn(&self) -> DynSolValue {
        DynSolValue::Tuple(vec![
            DynSolValue::Address(self.token),
            DynSolValue::Address(self.hop_router),
            DynSolValue::Address(self.recipient),
            DynSolValue::Uint(U256::from(self.target_chain_id), 256),
            DynSolValue::Uint(self.amount, 256),
            DynSolValue::Uint(self.bonder_fee, 256),
            DynSolValue::Uint(self.source_amount_out_min, 256),
            DynSolValue::Uint(self.source_deadline, 256),
            DynSolValue::Uint(self.destination_amount_out_min, 256),
            DynSolValue::Uint(self.destination_deadline, 256),
        ])
    }
}

/// Spell builder for one enabled Hop connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    connector: String,
}

impl Hop {
    pub fn new(connector: impl Into<String>) -> Self {
        Self {
            connector: connector.into(),
        }
    }

    pub fn bridge(&self, params: &BridgeParams, get_id: u64) -> Spell {
        Spell::new(
            &self.connector,
            "bridge",
            vec![params.to_dyn(), DynSolValue::Uint(U256::from(get_id), 256)],
        )
    }
}

/// `gas_price × gas_limit × 1.5 + amount × 0.72`.
///
/// Fails with [`HarnessError::FeeOverflow`] when an intermediate product
/// does not fit in 256 bits.
pub fn estimate_bonder_fee(amount: U256, gas_price_wei: u128, gas_limit: u64) -> Result<U256> {
    // u128 × u64 × 3 always fits.
    let gas_cost = U256::from(gas_price_wei) * U256::from(gas_limit) * U256::from(3u8)
        / U256::from(2u8);

    amount
        .checked_mul(U256::from(72u8))
        .map(|scaled| scaled / U256::from(100u8))
        .and_then(|amount_share| amount_share.checked_add(gas_cost))
        .ok_or(HarnessError::FeeOverflow { amount })
}

/// Seven days after `now`, in unix seconds.
pub fn default_deadline(now: SystemTime) -> U256 {
    let since_epoch = now.duration_since(UNIX_EPOCH).unwrap_or_default();
    U256::from((since_epoch + DEFAULT_DEADLINE_OFFSET).as_secs())
}

/// A decoded `TransferSent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferIntent {
    pub transfer_id: B256,
    pub chain_id: U256,
    pub recipient: Address,
    pub amount: U256,
    pub transfer_nonce: B256,
    pub bonder_fee: U256,
    pub index: U256,
    pub amount_out_min: U256,
    pub deadline: U256,
    pub block: Option<u64>,
    pub tx_hash: Option<B256>,
}

impl TransferIntent {
    fn from_event(
        event: IHopL2Bridge::TransferSent,
        block: Option<u64>,
        tx_hash: Option<B256>,
    ) -> Self {
        Self {
            transfer_id: event.transferId,
            chain_id: event.chainId,
            recipient: event.recipient,
            amount: event.amount,
            transfer_nonce: event.transferNonce,
            bonder_fee: event.bonderFee,
            index: event.index,
            amount_out_min: event.amountOutMin,
            deadline: event.deadline,
            block,
            tx_hash,
        }
    }
}

/// `TransferSent` events emitted by `l2_bridge` in `[from_block, to_block]`.
pub async fn transfer_intents(
    node: &ForkNode,
    l2_bridge: Address,
    from_block: u64,
    to_block: u64,
) -> Result<Vec<TransferIntent>> {
    let filter = Filter::new()
        .address(l2_bridge)
        .event_signature(IHopL2Bridge::TransferSent::SIGNATURE_HASH)
        .from_block(from_block)
        .to_block(to_block);

    let logs =
        with_retry("get_logs", || async { node.provider().get_logs(&filter).await }).await?;

    let intents = logs
        .iter()
        .map(|log| {
            let event = IHopL2Bridge::TransferSent::decode_log(&log.inner)?;
            Ok(TransferIntent::from_event(
                event.data,
                log.block_number,
                log.transaction_hash,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        %l2_bridge,
        from_block,
        to_block,
        count = intents.len(),
        "fetched transfer intents"
    );
    Ok(intents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spells::{ConnectorAbis, encode_spell};
    use alloy::{
        primitives::{address, utils::parse_ether},
        sol_types::SolCall,
    };

    const DAI: Address = address!("8f3Cf7ad23Cd3CaDbD9735AFf958023239c6A063");
    const AMM_WRAPPER: Address = address!("28529fec439cfF6d7D1D5917e956dEE62Cd3BE5c");
    const RECIPIENT: Address = address!("00000000000000000000000000000000000000b1");

    fn params() -> BridgeParams {
        let amount = parse_ether("10").unwrap();
        BridgeParams {
            token: DAI,
            hop_router: AMM_WRAPPER,
            recipient: RECIPIENT,
            target_chain_id: 1,
            amount,
            bonder_fee: estimate_bonder_fee(amount, REFERENCE_GAS_PRICE_WEI, REFERENCE_GAS_LIMIT)
                .unwrap(),
            source_amount_out_min: U256::ZERO,
            source_deadline: U256::from(1_700_604_800u64),
            destination_amount_out_min: U256::ZERO,
            destination_deadline: U256::ZERO,
        }
    }

    #[test]
    fn bonder_fee_reference_values() {
        let amount = parse_ether("10").unwrap();
        let fee =
            estimate_bonder_fee(amount, REFERENCE_GAS_PRICE_WEI, REFERENCE_GAS_LIMIT).unwrap();
        // 100 gwei * 150_000 * 1.5 = 0.0225 ether, plus 7.2 ether
        assert_eq!(fee, parse_ether("7.2225").unwrap());
    }

    #[test]
    fn bonder_fee_at_the_uint256_boundary() {
        let gas_cost = U256::from(22_500_000_000_000_000u64);

        // Largest amount whose 72x scaling still fits.
        let max_scalable = U256::MAX / U256::from(72u8);
        let fee = estimate_bonder_fee(max_scalable, REFERENCE_GAS_PRICE_WEI, REFERENCE_GAS_LIMIT)
            .unwrap();
        assert_eq!(
            fee,
            max_scalable * U256::from(72u8) / U256::from(100u8) + gas_cost
        );
        assert!(fee > max_scalable / U256::from(2u8));

        let amount = U256::MAX / U256::from(50u8);
        let err = estimate_bonder_fee(amount, REFERENCE_GAS_PRICE_WEI, REFERENCE_GAS_LIMIT)
            .unwrap_err();
        assert!(matches!(err, HarnessError::FeeOverflow { amount: a } if a == amount));

        assert!(estimate_bonder_fee(U256::MAX, u128::MAX, u64::MAX).is_err());
    }

    #[test]
    fn deadline_is_seven_days_in_seconds() {
        let now = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        assert_eq!(default_deadline(now), U256::from(1_700_604_800u64));
    }

    #[test]
    fn dynamic_encoding_matches_typed_call() {
        let mut abis = ConnectorAbis::new();
        abis.insert("HOP-A", IConnectV2Hop::abi::contract());

        let params = params();
        let data = encode_spell(&abis, &Hop::new("HOP-A").bridge(&params, 0)).unwrap();

        let expected = IConnectV2Hop::bridgeCall {
            params: params.to_sol(),
            getId: U256::ZERO,
        }
        .abi_encode();
        assert_eq!(data.as_ref(), expected.as_slice());
    }
}
