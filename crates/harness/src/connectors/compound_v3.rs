//! Compound III connector spells and market reads.

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, U256},
    providers::DynProvider,
};
use dsa_contracts::{NATIVE_TOKEN, protocols::IComet};

use crate::{error::Result, retry::with_retry, spells::Spell};

/// DSA memory slots a spell reads its amount from and writes its result to.
/// Zero disables either side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpellIds {
    pub get_id: u64,
    pub set_id: u64,
}

impl SpellIds {
    pub const NONE: Self = Self {
        get_id: 0,
        set_id: 0,
    };

    fn values(self) -> [DynSolValue; 2] {
        [uint(U256::from(self.get_id)), uint(U256::from(self.set_id))]
    }
}

/// Spell builder for one enabled Compound III connector.
///
/// Amounts of `U256::MAX` mean "everything" to the connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundV3 {
    connector: String,
    ids: SpellIds,
}

impl CompoundV3 {
    pub fn new(connector: impl Into<String>) -> Self {
        Self {
            connector: connector.into(),
            ids: SpellIds::NONE,
        }
    }

    /// Builder using `ids` for subsequent spells.
    pub fn with_ids(&self, ids: SpellIds) -> Self {
        Self {
            connector: self.connector.clone(),
            ids,
        }
    }

    pub fn connector(&self) -> &str {
        &self.connector
    }

    pub fn deposit(&self, market: Address, token: Address, amt: U256) -> Spell {
        self.spell("deposit", [addr(market), addr(token), uint(amt)])
    }

    pub fn deposit_on_behalf(
        &self,
        market: Address,
        token: Address,
        to: Address,
        amt: U256,
    ) -> Spell {
        self.spell("depositOnBehalf", [addr(market), addr(token), addr(to), uint(amt)])
    }

    pub fn deposit_from_using_manager(
        &self,
        market: Address,
        token: Address,
        from: Address,
        to: Address,
        amt: U256,
    ) -> Spell {
        self.spell(
            "depositFromUsingManager",
            [addr(market), addr(token), addr(from), addr(to), uint(amt)],
        )
    }

    pub fn borrow(&self, market: Address, amt: U256) -> Spell {
        self.spell("borrow", [addr(market), uint(amt)])
    }

    pub fn borrow_on_behalf(&self, market: Address, to: Address, amt: U256) -> Spell {
        self.spell("borrowOnBehalf", [addr(market), addr(to), uint(amt)])
    }

    pub fn borrow_from_using_manager(
        &self,
        market: Address,
        from: Address,
        to: Address,
        amt: U256,
    ) -> Spell {
        self.spell(
            "borrowFromUsingManager",
            [addr(market), addr(from), addr(to), uint(amt)],
        )
    }

    pub fn payback(&self, market: Address, amt: U256) -> Spell {
        self.spell("payback", [addr(market), uint(amt)])
    }

    pub fn payback_on_behalf(&self, market: Address, to: Address, amt: U256) -> Spell {
        self.spell("paybackOnBehalf", [addr(market), addr(to), uint(amt)])
    }

    pub fn payback_from_using_manager(
        &self,
        market: Address,
        from: Address,
        to: Address,
        amt: U256,
    ) -> Spell {
        self.spell(
            "paybackFromUsingManager",
            [addr(market), addr(from), addr(to), uint(amt)],
        )
    }

    pub fn withdraw(&self, market: Address, token: Address, amt: U256) -> Spell {
        self.spell("withdraw", [addr(market), addr(token), uint(amt)])
    }

    pub fn withdraw_on_behalf(&self, market: Address, to: Address, amt: U256) -> Spell {
        self.spell("withdrawOnBehalf", [addr(market), addr(to), uint(amt)])
    }

    pub fn withdraw_from_using_manager(
        &self,
        market: Address,
        token: Address,
        from: Address,
        to: Address,
        amt: U256,
    ) -> Spell {
        self.spell(
            "withdrawFromUsingManager",
            [addr(market), addr(token), addr(from), addr(to), uint(amt)],
        )
    }

    /// Allow or revoke `manager` on the DSA's market position. Takes no ids.
    pub fn toggle_account_manager(
        &self,
        market: Address,
        manager: Address,
        allowed: bool,
    ) -> Spell {
        Spell::new(
            &self.connector,
            "toggleAccountManager",
            vec![addr(market), addr(manager), DynSolValue::Bool(allowed)],
        )
    }

    pub fn buy_collateral(
        &self,
        market: Address,
        asset: Address,
        dest: Address,
        min_collateral_amt: U256,
        base_amt: U256,
    ) -> Spell {
        self.spell(
            "buyCollateral",
            [
                addr(market),
                addr(asset),
                addr(dest),
                uint(min_collateral_amt),
                uint(base_amt),
            ],
        )
    }

    pub fn transfer_asset(
        &self,
        market: Address,
        token: Address,
        dest: Address,
        amount: U256,
    ) -> Spell {
        self.spell(
            "transferAsset",
            [addr(market), addr(token), addr(dest), uint(amount)],
        )
    }

    pub fn transfer_asset_from_using_manager(
        &self,
        market: Address,
        token: Address,
        src: Address,
        dest: Address,
        amount: U256,
    ) -> Spell {
        self.spell(
            "transferAssetFromUsingManager",
            [addr(market), addr(token), addr(src), addr(dest), uint(amount)],
        )
    }

    fn spell<const N: usize>(&self, method: &str, args: [DynSolValue; N]) -> Spell {
        let args = args.into_iter().chain(self.ids.values()).collect();
        Spell::new(&self.connector, method, args)
    }
}

fn addr(address: Address) -> DynSolValue {
    DynSolValue::Address(address)
}

fn uint(value: U256) -> DynSolValue {
    DynSolValue::Uint(value, 256)
}

/// Snapshot of one account's position in a market.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Position {
    /// Collateral balance per requested asset, in request order.
    pub collateral: Vec<(Address, U256)>,
    /// Outstanding base borrow.
    pub borrow: U256,
    /// Supplied base balance.
    pub supply: U256,
}

impl Position {
    pub fn collateral_of(&self, asset: Address) -> Option<U256> {
        self.collateral
            .iter()
            .find_map(|(a, balance)| (*a == asset).then_some(*balance))
    }
}

/// Read side of a Comet market.
pub struct CometReader {
    comet: IComet::ICometInstance<DynProvider>,
    wrapped_native: Address,
}

impl CometReader {
    /// `wrapped_native` is the ERC-20 the market holds when a spell names
    /// the native token.
    pub fn new(market: Address, provider: DynProvider, wrapped_native: Address) -> Self {
        Self {
            comet: IComet::new(market, provider),
            wrapped_native,
        }
    }

    pub fn market(&self) -> Address {
        *self.comet.address()
    }

    fn asset(&self, token: Address) -> Address {
        if token == NATIVE_TOKEN { self.wrapped_native } else { token }
    }

    pub async fn collateral(&self, account: Address, asset: Address) -> Result<U256> {
        let asset = self.asset(asset);
        let collateral = with_retry("user_collateral", || async {
            self.comet.userCollateral(account, asset).call().await
        })
        .await?;
        Ok(U256::from(collateral.balance))
    }

    pub async fn borrow_balance(&self, account: Address) -> Result<U256> {
        Ok(with_retry("borrow_balance_of", || async {
            self.comet.borrowBalanceOf(account).call().await
        })
        .await?)
    }

    pub async fn supply_balance(&self, account: Address) -> Result<U256> {
        Ok(with_retry("balance_of", || async {
            self.comet.balanceOf(account).call().await
        })
        .await?)
    }

    pub async fn has_permission(&self, owner: Address, manager: Address) -> Result<bool> {
        Ok(with_retry("has_permission", || async {
            self.comet.hasPermission(owner, manager).call().await
        })
        .await?)
    }

    pub async fn base_token(&self) -> Result<Address> {
        Ok(with_retry("base_token", || async { self.comet.baseToken().call().await }).await?)
    }

    pub async fn position(&self, account: Address, assets: &[Address]) -> Result<Position> {
        let mut collateral = Vec::with_capacity(assets.len());
        for asset in assets {
            collateral.push((*asset, self.collateral(account, *asset).await?));
        }

        Ok(Position {
            collateral,
            borrow: self.borrow_balance(account).await?,
            supply: self.supply_balance(account).await?,
        })
    }
}
