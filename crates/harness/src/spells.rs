//! Spell encoding.
//!
//! A spell is one `(connector name, method, arguments)` instruction. A cast
//! sends the connector names and the ABI-encoded calls side by side; the DSA
//! resolves each name through the registry and delegate-calls the payload.
//! Calls are encoded against the connector's own ABI, registered when the
//! connector is deployed, so a spell naming a method the deployed connector
//! does not have fails before anything is sent.

use std::collections::HashMap;

use alloy::{
    dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier},
    json_abi::{Function, JsonAbi},
    primitives::{Address, Bytes},
    sol_types::SolCall,
};
use dsa_contracts::IInstaAccountV2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HarnessError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Spell {
    pub connector: String,
    pub method: String,
    pub args: Vec<DynSolValue>,
}

impl Spell {
    pub fn new(
        connector: impl Into<String>,
        method: impl Into<String>,
        args: Vec<DynSolValue>,
    ) -> Self {
        Self {
            connector: connector.into(),
            method: method.into(),
            args,
        }
    }
}

/// Connector name to ABI, filled as connectors are deployed and enabled.
#[derive(Debug, Clone, Default)]
pub struct ConnectorAbis {
    abis: HashMap<String, JsonAbi>,
}

impl ConnectorAbis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, connector: impl Into<String>, abi: JsonAbi) {
        self.abis.insert(connector.into(), abi);
    }

    pub fn get(&self, connector: &str) -> Option<&JsonAbi> {
        self.abis.get(connector)
    }

    pub fn contains(&self, connector: &str) -> bool {
        self.abis.contains_key(connector)
    }

    /// The overload of `method` taking `arity` arguments.
    pub fn function(&self, connector: &str, method: &str, arity: usize) -> Result<&Function> {
        let abi = self
            .get(connector)
            .ok_or_else(|| HarnessError::UnknownConnector(connector.to_string()))?;

        let overloads = abi
            .function(method)
            .ok_or_else(|| HarnessError::UnknownMethod {
                connector: connector.to_string(),
                method: method.to_string(),
            })?;

        overloads
            .iter()
            .find(|function| function.inputs.len() == arity)
            .ok_or_else(|| HarnessError::ArgumentCount {
                connector: connector.to_string(),
                method: method.to_string(),
                expected: overloads.iter().map(|f| f.inputs.len()).collect(),
                got: arity,
            })
    }
}

/// Parallel target names and calldatas, as `cast` takes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSpells {
    pub targets: Vec<String>,
    pub datas: Vec<Bytes>,
}

impl EncodedSpells {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn cast_call(&self, origin: Address) -> IInstaAccountV2::castCall {
        IInstaAccountV2::castCall {
            targetNames: self.targets.clone(),
            datas: self.datas.clone(),
            origin,
        }
    }

    /// Full `cast(string[],bytes[],address)` calldata.
    pub fn cast_calldata(&self, origin: Address) -> Bytes {
        self.cast_call(origin).abi_encode().into()
    }
}

/// Encode one spell's call against its connector's ABI.
pub fn encode_spell(abis: &ConnectorAbis, spell: &Spell) -> Result<Bytes> {
    let function = abis.function(&spell.connector, &spell.method, spell.args.len())?;
    let data = function
        .abi_encode_input(&spell.args)
        .map_err(|source| HarnessError::Encode {
            connector: spell.connector.clone(),
            method: spell.method.clone(),
            source,
        })?;
    Ok(data.into())
}

/// Encode a spell list for `cast`. Empty lists are rejected.
pub fn encode_spells(abis: &ConnectorAbis, spells: &[Spell]) -> Result<EncodedSpells> {
    if spells.is_empty() {
        return Err(HarnessError::EmptySpells);
    }

    let datas = spells
        .iter()
        .map(|spell| encode_spell(abis, spell))
        .collect::<Result<Vec<_>>>()?;

    Ok(EncodedSpells {
        targets: spells.iter().map(|spell| spell.connector.clone()).collect(),
        datas,
    })
}

/// A spell as written in JSON, arguments not yet typed.
///
/// Arguments are coerced against the connector's parameter types: strings
/// go through the Solidity literal parser, so large integers should be
/// given as strings, and tuples and arrays as JSON arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellJson {
    pub connector: String,
    pub method: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl SpellJson {
    pub fn resolve(&self, abis: &ConnectorAbis) -> Result<Spell> {
        let function = abis.function(&self.connector, &self.method, self.args.len())?;

        let args = function
            .inputs
            .iter()
            .zip(&self.args)
            .enumerate()
            .map(|(index, (param, value))| {
                let ty = param.resolve().map_err(|err| HarnessError::InvalidArgument {
                    method: self.method.clone(),
                    index,
                    reason: err.to_string(),
                })?;
                coerce_json(&ty, value).map_err(|reason| HarnessError::InvalidArgument {
                    method: self.method.clone(),
                    index,
                    reason,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Spell::new(&self.connector, &self.method, args))
    }
}

fn coerce_json(ty: &DynSolType, value: &Value) -> Result<DynSolValue, String> {
    match (ty, value) {
        (DynSolType::Tuple(types), Value::Array(items)) => {
            if types.len() != items.len() {
                return Err(format!(
                    "expected {} tuple fields, got {}",
                    types.len(),
                    items.len()
                ));
            }
            types
                .iter()
                .zip(items)
                .map(|(ty, item)| coerce_json(ty, item))
                .collect::<Result<Vec<_>, _>>()
                .map(DynSolValue::Tuple)
        }
        (DynSolType::Array(inner), Value::Array(items)) => items
            .iter()
            .map(|item| coerce_json(inner, item))
            .collect::<Result<Vec<_>, _>>()
            .map(DynSolValue::Array),
        (DynSolType::FixedArray(inner, len), Value::Array(items)) => {
            if *len != items.len() {
                return Err(format!("expected {len} elements, got {}", items.len()));
            }
            items
                .iter()
                .map(|item| coerce_json(inner, item))
                .collect::<Result<Vec<_>, _>>()
                .map(DynSolValue::FixedArray)
        }
        (_, Value::String(s)) => ty.coerce_str(s).map_err(|err| err.to_string()),
        (_, Value::Number(n)) => ty.coerce_str(&n.to_string()).map_err(|err| err.to_string()),
        (_, Value::Bool(b)) => ty
            .coerce_str(if *b { "true" } else { "false" })
            .map_err(|err| err.to_string()),
        (ty, other) => Err(format!("cannot use {other} as {ty}")),
    }
}
