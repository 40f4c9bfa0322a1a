use crate::consistency::Consistency;
use crate::numeric::NumericString;
use pnlreport_derive::Shape;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Aggregate profit and loss summary of a report, in the profit currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Shape)]
#[serde(rename_all = "camelCase")]
pub struct ProfitLossOverviewData {
    /// Profit from lending
    pub loan_profit: NumericString,
    /// Profit or loss from DeFi protocols
    pub defi_profit_loss: NumericString,
    /// Profit or loss from closed margin positions
    pub margin_positions_profit_loss: NumericString,
    /// Profit or loss from ledger actions (income, expenses, airdrops, gifts)
    pub ledger_actions_profit_loss: NumericString,
    /// Losses from settlements
    pub settlement_losses: NumericString,
    /// Gas paid for ethereum transactions
    pub ethereum_transaction_gas_costs: NumericString,
    /// Fees paid on deposits and withdrawals
    pub asset_movement_fees: NumericString,
    /// Profit or loss from all trades
    pub general_trade_profit_loss: NumericString,
    /// Profit or loss from trades within the taxable period
    pub taxable_trade_profit_loss: NumericString,
    /// Sum of all taxable profit or loss
    pub total_taxable_profit_loss: NumericString,
    /// Sum of all profit or loss
    pub total_profit_loss: NumericString,
}

impl Consistency for ProfitLossOverviewData {}
