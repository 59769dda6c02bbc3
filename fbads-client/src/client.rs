//! Live execution and batch submission against the Graph API.

use crate::config::{ClientConfig, DEFAULT_TIMEOUT_MS};
use crate::endpoints::{accounts, campaigns, stats};
use crate::transport::ReqwestTransport;
use fbads_core::{
    decode_batch, resolve, translate_response, AdsError, AdsResult, ApiRequest, BatchDescriptor,
    BatchItem, Credentials, FileRef, HttpRequest, Method, Transport, ACCESS_TOKEN,
    APPSECRET_PROOF, FACEBOOK_API,
};
use serde_json::Value;
use std::time::Duration;

/// Client for the Facebook Ads Graph API.
///
/// Holds only immutable state, so a shared reference can be used from
/// several tasks at once as far as the transport allows.
pub struct AdsClient<T: Transport = ReqwestTransport> {
    transport: T,
    credentials: Credentials,
    api_root: String,
    attach_appsecret_proof: bool,
}

impl AdsClient<ReqwestTransport> {
    /// Create a client with a reqwest transport using the default timeout.
    pub fn new(credentials: Credentials) -> AdsResult<Self> {
        let transport = ReqwestTransport::new(Duration::from_millis(DEFAULT_TIMEOUT_MS))?;
        Ok(Self::with_transport(credentials, transport))
    }

    pub fn from_config(config: &ClientConfig) -> AdsResult<Self> {
        config
            .validate()
            .map_err(|e| AdsError::Config(e.to_string()))?;
        let transport = ReqwestTransport::new(Duration::from_millis(config.request_timeout_ms))?;
        Ok(Self::with_transport(config.credentials(), transport)
            .with_api_root(&config.api_root)
            .with_appsecret_proof(config.attach_appsecret_proof))
    }
}

impl<T: Transport> AdsClient<T> {
    pub fn with_transport(credentials: Credentials, transport: T) -> Self {
        Self {
            transport,
            credentials,
            api_root: FACEBOOK_API.to_string(),
            attach_appsecret_proof: false,
        }
    }

    pub fn with_api_root(mut self, api_root: &str) -> Self {
        self.api_root = api_root.trim_end_matches('/').to_string();
        self
    }

    pub fn with_appsecret_proof(mut self, attach: bool) -> Self {
        self.attach_appsecret_proof = attach;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute one request now and return the decoded JSON body.
    ///
    /// The client's access token is added unless the request already carries
    /// one. Exactly one HTTP call is made. Only POST requests may carry
    /// files.
    pub async fn execute(&self, request: &ApiRequest) -> AdsResult<Value> {
        if request.method != Method::Post && request.has_files() {
            return Err(AdsError::precondition(format!(
                "{} {} cannot upload files",
                request.method, request.path
            )));
        }

        let url = self.url_for(&request.path);
        let mut args = request
            .args
            .clone()
            .with_default(ACCESS_TOKEN, self.credentials.access_token());
        if self.attach_appsecret_proof {
            args = args.with_default(APPSECRET_PROOF, self.credentials.appsecret_proof());
        }

        tracing::debug!(
            method = %request.method,
            url = %url,
            args = ?args.redacted(),
            files = request.files.len(),
            "Making Ads API request"
        );

        let pairs = args.into_pairs();
        let http = match request.method {
            Method::Post => HttpRequest {
                method: request.method,
                url: url.clone(),
                query: Vec::new(),
                form: pairs,
                files: resolve_files(request).await?,
            },
            Method::Get | Method::Delete => HttpRequest {
                method: request.method,
                url: url.clone(),
                query: pairs,
                form: Vec::new(),
                files: Vec::new(),
            },
        };

        let response = self.transport.send(http).await?;
        translate_response(&url, response)
    }

    /// Submit descriptors as one batch request.
    ///
    /// Results come back in submission order. If the outer call fails the
    /// whole batch fails; per-item failures are reported per item.
    pub async fn submit_batch(&self, batch: &[BatchDescriptor]) -> AdsResult<Vec<BatchItem>> {
        let encoded = serde_json::to_string(batch)?;
        let mut form = vec![
            (ACCESS_TOKEN.to_string(), self.credentials.access_token().to_string()),
            ("batch".to_string(), encoded),
        ];
        if self.attach_appsecret_proof {
            form.push((
                APPSECRET_PROOF.to_string(),
                self.credentials.appsecret_proof().to_string(),
            ));
        }

        let redacted: Vec<_> = batch.iter().map(BatchDescriptor::redacted).collect();
        tracing::debug!(
            url = %self.api_root,
            items = batch.len(),
            batch = ?redacted,
            "Making batched Ads API request"
        );

        let response = self
            .transport
            .send(HttpRequest {
                method: Method::Post,
                url: self.api_root.clone(),
                query: Vec::new(),
                form,
                files: Vec::new(),
            })
            .await?;
        decode_batch(&self.api_root, response, batch.len())
    }

    /// Submit a labeled batch and re-associate each result with its label.
    ///
    /// Labels are split off once, so the output carries exactly the input
    /// labels in input order; collect into any map or `Vec` of pairs.
    pub async fn submit_labeled_batch<K, I, M>(&self, batch: I) -> AdsResult<M>
    where
        I: IntoIterator<Item = (K, BatchDescriptor)>,
        M: FromIterator<(K, BatchItem)>,
    {
        let (labels, descriptors): (Vec<K>, Vec<BatchDescriptor>) = batch.into_iter().unzip();
        let results = self.submit_batch(&descriptors).await?;
        Ok(labels.into_iter().zip(results).collect())
    }

    /// First step of the page-post pipeline: fetch the page's own token.
    ///
    /// Always a live call; page posts are made with the token returned here.
    pub async fn resolve_page_token(&self, page_id: &str) -> AdsResult<PageToken> {
        let response = self.execute(&accounts::get_page_access_token(page_id)?).await?;
        let token = response
            .get(ACCESS_TOKEN)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AdsError::invalid_response(format!("no access_token returned for page {}", page_id))
            })?;
        Ok(PageToken {
            page_id: page_id.to_string(),
            access_token: token.to_string(),
        })
    }

    /// Account currency, campaigns and campaign stats in one batch.
    pub async fn adcampaign_list(&self, account_id: &str) -> AdsResult<Vec<BatchItem>> {
        let batch = [
            accounts::get_adaccount(account_id, &["currency"])?.describe()?,
            campaigns::get_adcampaigns(account_id, ADCAMPAIGN_LIST_FIELDS)?.describe()?,
            stats::get_stats_by_adcampaign(account_id, None)?.describe()?,
        ];
        self.submit_batch(&batch).await
    }

    /// Campaign settings plus overall, daily, per-adgroup, demographic and
    /// placement report stats for one campaign, in one batch.
    pub async fn adcampaign_detail(
        &self,
        account_id: &str,
        campaign_id: &str,
        date_preset: &str,
    ) -> AdsResult<Vec<BatchItem>> {
        let filters = serde_json::json!([{
            "field": "campaign_id",
            "type": "in",
            "value": [campaign_id],
        }]);
        let report = |increment: Value, columns: &[&str], group_by: &[&str]| {
            stats::get_adreport_stats(
                account_id,
                &stats::ReportStatsQuery {
                    date_preset: date_preset.to_string(),
                    time_increment: increment,
                    data_columns: columns.iter().map(|c| c.to_string()).collect(),
                    filters: Some(filters.clone()),
                    actions_group_by: group_by.iter().map(|g| g.to_string()).collect(),
                },
            )
            .and_then(|request| request.describe())
        };

        let batch = [
            accounts::get_adaccount(account_id, &["currency"])?.describe()?,
            campaigns::get_adcampaign(campaign_id, CAMPAIGN_DETAIL_FIELDS)?.describe()?,
            report("all_days".into(), CAMPAIGN_DATA_COLUMNS, &["action_type"])?,
            report(1.into(), CAMPAIGN_DATA_COLUMNS, &[])?,
            report("all_days".into(), ADGROUP_DATA_COLUMNS, &[])?,
            report("all_days".into(), DEMOGRAPHIC_DATA_COLUMNS, &[])?,
            report("all_days".into(), PLACEMENT_DATA_COLUMNS, &[])?,
        ];
        self.submit_batch(&batch).await
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }
}

/// Resolve upload names and content types off the async worker, since
/// sniffing a path-backed upload reads the start of the file.
async fn resolve_files(request: &ApiRequest) -> AdsResult<Vec<(String, FileRef)>> {
    if !request.has_files() {
        return Ok(Vec::new());
    }
    let uploads = request.files.clone();
    tokio::task::spawn_blocking(move || {
        uploads
            .into_iter()
            .map(|(field, upload)| {
                let file = resolve(upload, Some(field.as_str()), true);
                (field, file)
            })
            .collect()
    })
    .await
    .map_err(AdsError::transport)
}

const ADCAMPAIGN_LIST_FIELDS: &[&str] = &[
    "id",
    "name",
    "campaign_status",
    "start_time",
    "end_time",
    "daily_budget",
    "lifetime_budget",
    "budget_remaining",
];

const CAMPAIGN_DETAIL_FIELDS: &[&str] = &[
    "name",
    "campaign_status",
    "daily_budget",
    "lifetime_budget",
    "start_time",
    "end_time",
];

const CAMPAIGN_DATA_COLUMNS: &[&str] = &[
    "campaign_name", "reach", "frequency", "clicks", "actions", "total_actions", "ctr", "spend",
];

const ADGROUP_DATA_COLUMNS: &[&str] = &[
    "campaign_id", "campaign_name", "adgroup_id", "adgroup_name", "reach", "frequency", "clicks",
    "ctr", "actions", "cpm", "cpc", "spend",
];

const DEMOGRAPHIC_DATA_COLUMNS: &[&str] = &[
    "campaign_id", "reach", "frequency", "clicks", "actions", "spend", "cpc", "cpm", "ctr",
    "cost_per_total_action", "age", "gender",
];

const PLACEMENT_DATA_COLUMNS: &[&str] = &[
    "campaign_id", "reach", "frequency", "clicks", "actions", "spend", "cpc", "cpm", "ctr",
    "cost_per_total_action", "placement",
];

/// A page access token obtained by [`AdsClient::resolve_page_token`].
#[derive(Clone, PartialEq, Eq)]
pub struct PageToken {
    pub page_id: String,
    pub access_token: String,
}

impl std::fmt::Debug for PageToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageToken")
            .field("page_id", &self.page_id)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl<T: Transport> std::fmt::Debug for AdsClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdsClient")
            .field("api_root", &self.api_root)
            .field("credentials", &self.credentials)
            .field("attach_appsecret_proof", &self.attach_appsecret_proof)
            .finish()
    }
}
