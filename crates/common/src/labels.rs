use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::error::{Error, Result};

/// Intent categories the classifiers can emit.
///
/// The set is fixed at compile time. Every variant except [`ClassLabel::Oos`]
/// is in scope for the primary classifier; `Oos` is reserved for the
/// out-of-scope classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassLabel {
    AccountBlocked,
    ApplicationStatus,
    Apr,
    Balance,
    BillBalance,
    BillDue,
    CardDeclined,
    CreditLimit,
    CreditLimitChange,
    CreditScore,
    DamagedCard,
    DirectDeposit,
    ExchangeRate,
    ExpirationDate,
    FreezeAccount,
    ImproveCreditScore,
    Insurance,
    InsuranceChange,
    InterestRate,
    InternationalFees,
    MinPayment,
    NewCard,
    OrderChecks,
    PayBill,
    PinChange,
    RedeemRewards,
    ReplacementCardDuration,
    ReportFraud,
    ReportLostCard,
    RewardsBalance,
    #[serde(rename = "rollover_401k")]
    Rollover401k,
    Taxes,
    Transactions,
    Transfer,
    Oos,
}

impl ClassLabel {
    /// All in-scope labels, in vocabulary order
    pub const IN_SCOPE: [ClassLabel; 34] = [
        ClassLabel::AccountBlocked,
        ClassLabel::ApplicationStatus,
        ClassLabel::Apr,
        ClassLabel::Balance,
        ClassLabel::BillBalance,
        ClassLabel::BillDue,
        ClassLabel::CardDeclined,
        ClassLabel::CreditLimit,
        ClassLabel::CreditLimitChange,
        ClassLabel::CreditScore,
        ClassLabel::DamagedCard,
        ClassLabel::DirectDeposit,
        ClassLabel::ExchangeRate,
        ClassLabel::ExpirationDate,
        ClassLabel::FreezeAccount,
        ClassLabel::ImproveCreditScore,
        ClassLabel::Insurance,
        ClassLabel::InsuranceChange,
        ClassLabel::InterestRate,
        ClassLabel::InternationalFees,
        ClassLabel::MinPayment,
        ClassLabel::NewCard,
        ClassLabel::OrderChecks,
        ClassLabel::PayBill,
        ClassLabel::PinChange,
        ClassLabel::RedeemRewards,
        ClassLabel::ReplacementCardDuration,
        ClassLabel::ReportFraud,
        ClassLabel::ReportLostCard,
        ClassLabel::RewardsBalance,
        ClassLabel::Rollover401k,
        ClassLabel::Taxes,
        ClassLabel::Transactions,
        ClassLabel::Transfer,
    ];

    /// The reserved out-of-scope label
    pub const OOS: ClassLabel = ClassLabel::Oos;

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassLabel::AccountBlocked => "account_blocked",
            ClassLabel::ApplicationStatus => "application_status",
            ClassLabel::Apr => "apr",
            ClassLabel::Balance => "balance",
            ClassLabel::BillBalance => "bill_balance",
            ClassLabel::BillDue => "bill_due",
            ClassLabel::CardDeclined => "card_declined",
            ClassLabel::CreditLimit => "credit_limit",
            ClassLabel::CreditLimitChange => "credit_limit_change",
            ClassLabel::CreditScore => "credit_score",
            ClassLabel::DamagedCard => "damaged_card",
            ClassLabel::DirectDeposit => "direct_deposit",
            ClassLabel::ExchangeRate => "exchange_rate",
            ClassLabel::ExpirationDate => "expiration_date",
            ClassLabel::FreezeAccount => "freeze_account",
            ClassLabel::ImproveCreditScore => "improve_credit_score",
            ClassLabel::Insurance => "insurance",
            ClassLabel::InsuranceChange => "insurance_change",
            ClassLabel::InterestRate => "interest_rate",
            ClassLabel::InternationalFees => "international_fees",
            ClassLabel::MinPayment => "min_payment",
            ClassLabel::NewCard => "new_card",
            ClassLabel::OrderChecks => "order_checks",
            ClassLabel::PayBill => "pay_bill",
            ClassLabel::PinChange => "pin_change",
            ClassLabel::RedeemRewards => "redeem_rewards",
            ClassLabel::ReplacementCardDuration => "replacement_card_duration",
            ClassLabel::ReportFraud => "report_fraud",
            ClassLabel::ReportLostCard => "report_lost_card",
            ClassLabel::RewardsBalance => "rewards_balance",
            ClassLabel::Rollover401k => "rollover_401k",
            ClassLabel::Taxes => "taxes",
            ClassLabel::Transactions => "transactions",
            ClassLabel::Transfer => "transfer",
            ClassLabel::Oos => "oos",
        }
    }

    pub fn is_out_of_scope(&self) -> bool {
        *self == ClassLabel::Oos
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == ClassLabel::OOS.as_str() {
            return Ok(ClassLabel::OOS);
        }
        ClassLabel::IN_SCOPE
            .iter()
            .copied()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| Error::BadRequest(format!("Unknown class label: {}", s)))
    }
}

/// Label set a classifier is allowed to predict from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vocabulary {
    /// In-scope intents only
    InScope,
    /// In-scope intents plus the out-of-scope label
    WithOos,
}

impl Vocabulary {
    pub fn contains(&self, label: ClassLabel) -> bool {
        match self {
            Vocabulary::InScope => !label.is_out_of_scope(),
            Vocabulary::WithOos => true,
        }
    }

    pub fn labels(&self) -> Vec<ClassLabel> {
        let mut labels = ClassLabel::IN_SCOPE.to_vec();
        if *self == Vocabulary::WithOos {
            labels.push(ClassLabel::OOS);
        }
        labels
    }
}

/// Which of the two loaded classifiers a request is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictorKind {
    Primary,
    Oos,
}

impl PredictorKind {
    pub fn vocabulary(&self) -> Vocabulary {
        match self {
            PredictorKind::Primary => Vocabulary::InScope,
            PredictorKind::Oos => Vocabulary::WithOos,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictorKind::Primary => "primary",
            PredictorKind::Oos => "oos",
        }
    }
}

impl fmt::Display for PredictorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
