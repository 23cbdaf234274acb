//! Fixture funding: native transfers, token balances and approvals.

use alloy::{
    primitives::{Address, B256, U256, keccak256},
    rpc::types::{TransactionReceipt, TransactionRequest},
    sol_types::{SolCall, SolValue},
};
use dsa_contracts::protocols::IERC20;
use tracing::{debug, info};

use crate::{
    addresses::{Funding, TokenInfo},
    error::Result,
    fork::ForkNode,
    retry::with_retry,
};

/// Gas money for impersonated holders, which may be contracts with no ether.
const HOLDER_GAS_WEI: u128 = 1_000_000_000_000_000_000;

/// Send native currency from an unlocked account.
pub async fn fund_native(
    node: &ForkNode,
    from: Address,
    to: Address,
    wei: U256,
) -> Result<TransactionReceipt> {
    let receipt = node.send_value(from, to, wei).await?;
    debug!(%from, %to, %wei, "native funded");
    Ok(receipt)
}

/// Give `to` an extra `amount` of `token`.
pub async fn add_liquidity(
    node: &ForkNode,
    token: &TokenInfo,
    to: Address,
    amount: U256,
) -> Result<()> {
    match token.funding {
        Funding::Native => {
            let current = node.native_balance(to).await?;
            node.set_balance(to, current.saturating_add(amount)).await?;
        }
        Funding::Holder(holder) => {
            node.impersonate(holder).await?;
            let holder_balance = node.native_balance(holder).await?;
            if holder_balance < U256::from(HOLDER_GAS_WEI) {
                node.set_balance(holder, U256::from(HOLDER_GAS_WEI)).await?;
            }

            let call = IERC20::transferCall { to, amount };
            let tx = TransactionRequest::default()
                .from(holder)
                .to(token.address)
                .input(call.abi_encode().into());
            node.send(tx).await?;
            node.stop_impersonating(holder).await?;
        }
        Funding::BalanceSlot(slot) => {
            let current = erc20_balance(node, token.address, to).await?;
            let key = balance_slot_key(to, slot);
            let value = B256::from(current.saturating_add(amount));
            node.set_storage(token.address, key, value).await?;
        }
    }

    info!(token = %token.symbol, %to, %amount, "liquidity added");
    Ok(())
}

/// `approve(spender, amount)` on `token`, sent as `owner`.
///
/// `owner` must be unlocked or impersonated; a DSA wallet address works once
/// impersonated.
pub async fn approve(
    node: &ForkNode,
    owner: Address,
    token: Address,
    spender: Address,
    amount: U256,
) -> Result<TransactionReceipt> {
    let call = IERC20::approveCall { spender, amount };
    let tx = TransactionRequest::default()
        .from(owner)
        .to(token)
        .input(call.abi_encode().into());
    let receipt = node.send(tx).await?;
    debug!(%owner, %token, %spender, %amount, "approved");
    Ok(receipt)
}

pub async fn erc20_balance(node: &ForkNode, token: Address, account: Address) -> Result<U256> {
    let erc20 = IERC20::new(token, node.provider());
    let balance = with_retry("balance_of", || async {
        erc20.balanceOf(account).call().await
    })
    .await?;
    Ok(balance)
}

/// Balance of `account` in `token`, native or ERC-20.
pub async fn balance_of(node: &ForkNode, token: &TokenInfo, account: Address) -> Result<U256> {
    match token.funding {
        Funding::Native => node.native_balance(account).await,
        _ => erc20_balance(node, token.address, account).await,
    }
}

/// Storage key of `holder`'s entry in a `mapping(address => uint256)` declared at `slot`.
pub fn balance_slot_key(holder: Address, slot: u64) -> B256 {
    keccak256((holder, U256::from(slot)).abi_encode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn slot_key_hashes_padded_holder_then_slot() {
        let holder = address!("00000000000000000000000000000000000000aa");
        let mut preimage = [0u8; 64];
        preimage[12..32].copy_from_slice(holder.as_slice());
        preimage[63] = 2;

        assert_eq!(balance_slot_key(holder, 2), keccak256(preimage));
    }

    #[test]
    fn slot_key_depends_on_slot() {
        let holder = address!("72a53cdbbcc1b9efa39c834a540550e23463aacb");
        assert_ne!(balance_slot_key(holder, 0), balance_slot_key(holder, 1));
    }
}
