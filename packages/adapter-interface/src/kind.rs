use std::fmt;
use std::str::FromStr;

use cosmwasm_schema::cw_serde;

use crate::error::KindError;

/// Contract name of the router stand-in that executes adapter call sequences.
pub const TEST_DEFI_ADAPTER: &str = "TestDeFiAdapter";

/// The adapter contracts this workspace knows how to deploy and exercise.
#[cw_serde]
#[derive(Copy, Eq, Hash)]
pub enum AdapterKind {
    /// SushiSwap's SUSHI bar on Ethereum (stake SUSHI, receive xSUSHI)
    SushiBar,
    /// Pangolin's single-sided staking pools on Avalanche (rewards paid in PNG)
    PangolinStake,
}

impl AdapterKind {
    pub const ALL: [AdapterKind; 2] = [AdapterKind::SushiBar, AdapterKind::PangolinStake];

    /// Name of the compiled contract (artifact name).
    pub fn contract_name(&self) -> &'static str {
        match self {
            AdapterKind::SushiBar => "SushiBarAdapter",
            AdapterKind::PangolinStake => "PangolinStakeAdapter",
        }
    }

    /// Name of the operator command that deploys this adapter.
    pub fn deploy_command(&self) -> &'static str {
        match self {
            AdapterKind::SushiBar => "deploy-sushi-bar-adapter",
            AdapterKind::PangolinStake => "deploy-pangolin-stake-adapter",
        }
    }

    /// Network family the wrapped protocol lives on.
    pub fn network(&self) -> &'static str {
        match self {
            AdapterKind::SushiBar => "ethereum",
            AdapterKind::PangolinStake => "avalanche",
        }
    }

    pub fn from_contract_name(name: &str) -> Option<Self> {
        AdapterKind::ALL
            .into_iter()
            .find(|kind| kind.contract_name() == name)
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.contract_name())
    }
}

impl FromStr for AdapterKind {
    type Err = KindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sushi-bar" | "SushiBarAdapter" => Ok(AdapterKind::SushiBar),
            "pangolin-stake" | "PangolinStakeAdapter" => Ok(AdapterKind::PangolinStake),
            other => Err(KindError::UnknownKind {
                name: other.to_string(),
            }),
        }
    }
}
