//! Built-in demonstration catalog
//!
//! The workbench expects an externally supplied, already-loaded variable
//! catalog. Until the backend reports one for the uploaded file, the app
//! runs against this survey-shaped sample.

use std::collections::BTreeMap;

use xt_core::{Variable, VariableType};

/// A small survey-style catalog for demonstration
pub fn sample_catalog() -> Vec<Variable> {
    let mut gender_labels = BTreeMap::new();
    gender_labels.insert("1".to_string(), "Male".to_string());
    gender_labels.insert("2".to_string(), "Female".to_string());

    let mut satisfaction_labels = BTreeMap::new();
    satisfaction_labels.insert("1".to_string(), "Very dissatisfied".to_string());
    satisfaction_labels.insert("5".to_string(), "Very satisfied".to_string());

    let mut gender = Variable::new("1", "gender", "Gender", VariableType::Categorical);
    gender.value_labels = Some(gender_labels);
    gender.measure = Some("nominal".to_string());

    let mut satisfaction = Variable::new(
        "2",
        "satisfaction",
        "Overall satisfaction",
        VariableType::Categorical,
    );
    satisfaction.value_labels = Some(satisfaction_labels);
    satisfaction.measure = Some("ordinal".to_string());

    let mut age = Variable::new("3", "age", "Age of respondent", VariableType::Numeric);
    age.measure = Some("scale".to_string());

    let mut region = Variable::new("4", "region", "Region", VariableType::Categorical);
    region.measure = Some("nominal".to_string());

    let mut income = Variable::new("5", "income", "Household income", VariableType::Numeric);
    income.measure = Some("scale".to_string());

    let comments = Variable::new("6", "comments", "Open comments", VariableType::Text);

    vec![gender, satisfaction, age, region, income, comments]
}
