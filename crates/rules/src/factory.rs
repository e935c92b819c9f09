//! Write direction: simplified parameters to engine condition configurations.

use std::collections::BTreeSet;

use tracing::{debug, info};
use uuid::Uuid;

use wizard_core::{DefaultValues, Result, WizardError, WizardSettings};

use crate::codec::minutes_to_ms;
use crate::expression::build_expression;
use crate::schema::{
    decode_params, with_defaults, AggregationConditions, AggregationCountConfig,
    AggregationEventConfig, AggregationParams, AggregationSeries, ConditionKind,
    CorrelationCountConfig, CorrelationParams, EngineConfig, MessageOrder, ParameterMap,
    StatisticalFunction, StatisticalParams,
};

/// Builds engine condition configurations from user parameters.
///
/// Absent parameters are filled from the configured [`DefaultValues`] before
/// the map is decoded, so the same input always yields the same output
/// (apart from the generated series id of statistical conditions).
#[derive(Debug, Clone, Default)]
pub struct ConditionFactory {
    settings: WizardSettings,
    defaults: DefaultValues,
}

impl ConditionFactory {
    pub fn new(settings: WizardSettings, defaults: DefaultValues) -> Self {
        Self { settings, defaults }
    }

    pub fn settings(&self) -> &WizardSettings {
        &self.settings
    }

    pub fn defaults(&self) -> &DefaultValues {
        &self.defaults
    }

    /// Route to the builder for the kind named by `condition_type`.
    ///
    /// `stream_id2` is only used by correlations.
    pub fn dispatch(
        &self,
        condition_type: &str,
        params: &ParameterMap,
        stream_id: &str,
        stream_id2: Option<&str>,
    ) -> Result<EngineConfig> {
        let kind = ConditionKind::from_tag(condition_type);
        info!(condition_type, %kind, stream_id, "Create condition");
        match kind {
            ConditionKind::Correlation(order) => {
                self.create_correlation_condition(order, stream_id, stream_id2, params)
            }
            ConditionKind::Statistical => self.create_statistical_condition(stream_id, params),
            ConditionKind::Aggregation => self.create_aggregation_condition(stream_id, params),
        }
    }

    pub fn create_aggregation_condition(
        &self,
        stream_id: &str,
        params: &ParameterMap,
    ) -> Result<EngineConfig> {
        require_stream(stream_id, "stream")?;
        let filled = with_defaults(params, ConditionKind::Aggregation, &self.defaults);
        let p: AggregationParams = decode_params(&filled, "aggregation")?;

        Ok(EngineConfig::AggregationCount(AggregationCountConfig {
            stream: stream_id.to_string(),
            threshold_type: p.threshold_type,
            threshold: p.threshold,
            search_within_ms: minutes_to_ms(p.time),
            execute_every_ms: minutes_to_ms(p.grace),
            grouping_fields: p.grouping_fields,
            distinction_fields: p.distinction_fields,
            comment: self.settings.comment.clone(),
            search_query: self.settings.search_query.clone(),
        }))
    }

    pub fn create_correlation_condition(
        &self,
        order: MessageOrder,
        stream_id: &str,
        stream_id2: Option<&str>,
        params: &ParameterMap,
    ) -> Result<EngineConfig> {
        require_stream(stream_id, "stream")?;
        let stream_id2 = stream_id2.unwrap_or_default();
        require_stream(stream_id2, "second stream")?;

        let filled = with_defaults(params, ConditionKind::Correlation(order), &self.defaults);
        let p: CorrelationParams = decode_params(&filled, "correlation")?;

        Ok(EngineConfig::CorrelationCount(CorrelationCountConfig {
            stream: stream_id.to_string(),
            threshold_type: p.threshold_type,
            threshold: p.threshold,
            additional_stream: stream_id2.to_string(),
            additional_threshold_type: p.additional_threshold_type,
            additional_threshold: p.additional_threshold,
            messages_order: order,
            search_within_ms: minutes_to_ms(p.time),
            execute_every_ms: minutes_to_ms(p.grace),
            grouping_fields: p.grouping_fields,
            comment: self.settings.comment.clone(),
            search_query: self.settings.search_query.clone(),
        }))
    }

    pub fn create_statistical_condition(
        &self,
        stream_id: &str,
        params: &ParameterMap,
    ) -> Result<EngineConfig> {
        require_stream(stream_id, "stream")?;
        let filled = with_defaults(params, ConditionKind::Statistical, &self.defaults);
        let p: StatisticalParams = decode_params(&filled, "statistical")?;
        debug!(function = %p.function, field = %p.field, "Building statistical condition");

        let function: StatisticalFunction = p
            .function
            .parse()
            .map_err(|_| WizardError::UnsupportedFunction(p.function.clone()))?;

        let series_id = Uuid::new_v4().to_string();
        let expression = build_expression(&p.threshold_type, &series_id, p.threshold)?;
        let series = AggregationSeries {
            id: series_id,
            function: function.to_engine(),
            field: Some(p.field),
        };

        Ok(EngineConfig::Aggregation(AggregationEventConfig {
            query: String::new(),
            streams: BTreeSet::from([stream_id.to_string()]),
            group_by: Vec::new(),
            series: vec![series],
            conditions: Some(AggregationConditions {
                expression: Some(expression),
            }),
            search_within_ms: minutes_to_ms(p.time),
            execute_every_ms: minutes_to_ms(p.grace),
        }))
    }
}

fn require_stream(stream_id: &str, what: &str) -> Result<()> {
    if stream_id.trim().is_empty() {
        return Err(WizardError::InvalidRequest(format!("{} id is required", what)));
    }
    Ok(())
}
