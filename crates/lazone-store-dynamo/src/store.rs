//! [`DynamoStore`] is the DynamoDB implementation of [`ArticleStore`].

use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client;
use lazone_core::{
  attr::Item,
  store::{ArticleStore, ContinuationToken, ScanPage, ScanRequest},
};

use crate::{
  Result,
  convert::{from_item_map, to_item_map},
  expr::render,
};

#[derive(Debug, Clone)]
pub struct DynamoStore {
  client: Client,
  table:  String,
}

impl DynamoStore {
  pub fn new(client: Client, table: impl Into<String>) -> Self {
    Self { client, table: table.into() }
  }

  /// Build a client from the ambient AWS configuration (environment,
  /// profile, or instance role).
  pub async fn connect(table: impl Into<String>) -> Self {
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    Self::new(Client::new(&config), table)
  }

  pub fn table(&self) -> &str { &self.table }
}

impl ArticleStore for DynamoStore {
  type Error = crate::Error;

  async fn scan<'a>(&'a self, request: ScanRequest<'a>) -> Result<ScanPage> {
    let limit = i32::try_from(request.limit).unwrap_or(i32::MAX);
    let mut op = self.client.scan().table_name(&self.table).limit(limit);

    if let Some(filter) = request.filter {
      let rendered = render(filter);
      op = op
        .filter_expression(rendered.expression)
        .set_expression_attribute_names(Some(rendered.names));
      // The service rejects an empty value map.
      if !rendered.values.is_empty() {
        op = op.set_expression_attribute_values(Some(rendered.values));
      }
    }
    if let Some(ContinuationToken(key)) = request.start {
      op = op.set_exclusive_start_key(Some(to_item_map(&key)));
    }

    let output = op.send().await.map_err(aws_sdk_dynamodb::Error::from)?;

    let items = output
      .items
      .unwrap_or_default()
      .into_iter()
      .map(from_item_map)
      .collect::<Result<Vec<_>>>()?;
    let next = output
      .last_evaluated_key
      .filter(|key| !key.is_empty())
      .map(from_item_map)
      .transpose()?
      .map(ContinuationToken);

    tracing::debug!(
      table = %self.table,
      scanned = output.scanned_count,
      matched = items.len(),
      more = next.is_some(),
      "dynamodb scan page"
    );
    Ok(ScanPage { items, next })
  }

  async fn put_item(&self, item: Item) -> Result<()> {
    self
      .client
      .put_item()
      .table_name(&self.table)
      .set_item(Some(to_item_map(&item)))
      .send()
      .await
      .map_err(aws_sdk_dynamodb::Error::from)?;
    Ok(())
  }
}
