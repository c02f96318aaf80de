//! Typed collections over DynamoDB tables.
//!
//! A [`Database`] is a namespace of tables; each [`Collection`] is one table
//! named `<database>.<collection>`, keyed by the string partition key `_id`.
//! Entities pass through their [`ClassMap`](mapping::ClassMap) on the way in
//! and out, so filters and sort orders are written against member names.

use crate::{
    common::{
        self,
        condition::{Condition, Filter},
        key, sort,
    },
    config,
    entity::Entity,
    error::{Error, Result},
    mapping, read, table, write,
};

use aws_sdk_dynamodb::{
    Client,
    config::{BehaviorVersion, Credentials, Region},
    types,
};
use serde::Serialize;
use serde_json::Value;
use std::{collections, marker, sync};

const LOCAL_REGION: &str = "us-east-1";

type Item = collections::HashMap<String, types::AttributeValue>;

/// A connected namespace of collections.
#[derive(Clone, Debug)]
pub struct Database {
    client: Client,
    connection: config::ConnectionString,
}

impl Database {
    /// Connect to the store named by `connection`.
    ///
    /// The endpoint is expected to be a local store, so static credentials
    /// and a fixed region are used. No request is sent until the first
    /// operation.
    pub fn connect(connection: &config::ConnectionString) -> Self {
        let sdk_config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&connection.endpoint_url)
            .region(Region::new(LOCAL_REGION))
            .credentials_provider(Credentials::new("local", "local", None, None, "static"))
            .build();
        Self::from_client(Client::from_conf(sdk_config), connection.clone())
    }

    /// Use an already configured client.
    pub fn from_client(client: Client, connection: config::ConnectionString) -> Self {
        Self { client, connection }
    }

    /// The database name.
    pub fn name(&self) -> &str {
        &self.connection.database
    }

    /// The underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Drop a collection and every document in it. Dropping a missing collection succeeds.
    pub async fn drop_collection(&self, name: &str) -> Result<()> {
        table::DeleteTable {
            table_name: self.connection.table_name(name),
        }
        .send(&self.client)
        .await
    }

    /// Open a collection of `E`, creating its table if needed.
    ///
    /// The class map of `E` is resolved here; if none was registered the
    /// default mapping is frozen for the rest of the process.
    pub async fn collection<E: Entity>(&self, name: &str) -> Result<Collection<E>> {
        let table_name = self.connection.table_name(name);
        table::CreateTable {
            table_name: table_name.clone(),
        }
        .send(&self.client)
        .await?;
        Ok(Collection {
            class_map: mapping::class_maps().lookup::<E>(),
            client: self.client.clone(),
            table_name,
            entity: marker::PhantomData,
        })
    }
}

/// What [`Collection::find`] matches and how it orders the result.
#[derive(Clone, Debug, PartialEq)]
pub struct FindOptions<T> {
    /// Filter over members; `None` matches every document.
    pub filter: Option<Filter<T>>,
    /// Order over a member; `None` keeps storage order.
    pub sort: Option<sort::SortBy>,
}

impl<T> Default for FindOptions<T> {
    fn default() -> Self {
        Self {
            filter: None,
            sort: None,
        }
    }
}

/// Result of [`Collection::replace_one`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReplaceOutcome {
    /// 1 if a document with the entity's identifier was replaced, 0 otherwise.
    pub matched: u64,
}

/// Result of [`Collection::delete_one`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DeleteOutcome {
    /// 1 if a document was removed, 0 otherwise.
    pub deleted: u64,
}

/// The documents of one table, read and written as `E`.
#[derive(Debug)]
pub struct Collection<E> {
    class_map: sync::Arc<mapping::ClassMap>,
    client: Client,
    table_name: String,
    entity: marker::PhantomData<fn() -> E>,
}

impl<E> Clone for Collection<E> {
    fn clone(&self) -> Self {
        Self {
            class_map: self.class_map.clone(),
            client: self.client.clone(),
            table_name: self.table_name.clone(),
            entity: marker::PhantomData,
        }
    }
}

impl<E: Entity> Collection<E> {
    /// The table backing this collection.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// The class map entities pass through.
    pub fn class_map(&self) -> &mapping::ClassMap {
        &self.class_map
    }

    fn assign_id(entity: &mut E) -> key::DocumentId {
        match entity.id() {
            Some(id) => id.clone(),
            None => {
                let id = key::DocumentId::generate();
                entity.set_id(id.clone());
                id
            }
        }
    }

    fn read_args<T>(&self, filter: Option<Filter<T>>) -> read::common::ReadArgs<T> {
        read::common::ReadArgs {
            consistent_read: Some(true),
            filter,
            select: None,
            table_name: self.table_name.clone(),
        }
    }

    fn guarded_write(
        &self,
        condition: Condition<key::DocumentId>,
    ) -> write::common::WriteArgs<key::DocumentId> {
        write::common::WriteArgs {
            condition: Some(Filter::field(common::ID_ELEMENT, condition)),
            table_name: self.table_name.clone(),
            ..Default::default()
        }
    }

    fn decode(&self, items: Vec<Item>, sort_by: Option<&sort::SortBy>) -> Result<Vec<E>> {
        let mut documents = items
            .into_iter()
            .map(serde_dynamo::from_item)
            .collect::<serde_dynamo::Result<Vec<common::Document>>>()?;
        if let Some(sort_by) = sort_by {
            sort_by.sort(&mut documents);
        }
        documents
            .into_iter()
            .map(|document| self.class_map.from_document(document))
            .collect()
    }

    /// Insert one entity, assigning its identifier first if it has none.
    ///
    /// Fails if a document with that identifier already exists.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "employee_crud.insert_one",
            skip_all,
            fields(table = %self.table_name),
            err
        )
    )]
    pub async fn insert_one(&self, entity: &mut E) -> Result<key::DocumentId> {
        let id = Self::assign_id(entity);
        let put_item = write::put_item::PutItem {
            item: self.class_map.to_document(entity)?,
            write_args: self.guarded_write(Condition::Null),
        };
        put_item
            .send(&self.client)
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;
        Ok(id)
    }

    /// Insert many entities, assigning identifiers to those that have none.
    ///
    /// Fails with [`Error::Unprocessed`] if the store left part of the batch unwritten.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "employee_crud.insert_many",
            skip_all,
            fields(table = %self.table_name, count = entities.len()),
            err
        )
    )]
    pub async fn insert_many(&self, entities: &mut [E]) -> Result<Vec<key::DocumentId>> {
        let mut ids = Vec::with_capacity(entities.len());
        let mut items = Vec::with_capacity(entities.len());
        for entity in entities.iter_mut() {
            ids.push(Self::assign_id(entity));
            items.push(self.class_map.to_document(entity)?);
        }
        let outputs = write::batch_write_item::BatchWriteItem {
            items,
            table_name: self.table_name.clone(),
        }
        .send(&self.client)
        .await
        .map_err(aws_sdk_dynamodb::Error::from)?;
        match write::batch_write_item::unprocessed_count(&outputs) {
            0 => Ok(ids),
            unprocessed => Err(Error::Unprocessed(unprocessed)),
        }
    }

    /// Number of documents in the collection.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "employee_crud.count",
            skip_all,
            fields(table = %self.table_name),
            err
        )
    )]
    pub async fn count(&self) -> Result<u64> {
        let scan: read::scan::Scan<Value> = read::scan::Scan {
            read_args: read::common::ReadArgs {
                select: Some(types::Select::Count),
                ..self.read_args(None)
            },
        };
        let output = scan
            .send(&self.client)
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;
        Ok(output.count.unsigned_abs().into())
    }

    /// Every entity matching the filter, in the requested order.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "employee_crud.find",
            skip_all,
            fields(table = %self.table_name),
            err
        )
    )]
    pub async fn find<T: Serialize>(&self, options: FindOptions<T>) -> Result<Vec<E>> {
        let filter = options
            .filter
            .map(|filter| self.class_map.translate_filter(filter))
            .transpose()?;
        let sort_by = options
            .sort
            .map(|sort_by| self.class_map.translate_sort(sort_by))
            .transpose()?;
        let scan = read::scan::Scan {
            read_args: self.read_args(filter),
        };
        let output = scan
            .send(&self.client)
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;
        self.decode(output.items.unwrap_or_default(), sort_by.as_ref())
    }

    /// Any one entity matching the filter.
    pub async fn find_one<T: Serialize>(&self, filter: Filter<T>) -> Result<Option<E>> {
        let options = FindOptions {
            filter: Some(filter),
            sort: None,
        };
        Ok(self.find(options).await?.into_iter().next())
    }

    /// The entity stored under `id`, if any.
    ///
    /// Fails with [`Error::MultipleMatches`] if more than one document answers.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "employee_crud.find_by_id",
            skip_all,
            fields(table = %self.table_name, id = %id),
            err
        )
    )]
    pub async fn find_by_id(&self, id: &key::DocumentId) -> Result<Option<E>> {
        let query: read::query::Query<Value> = read::query::Query {
            key: id.clone().into(),
            read_args: self.read_args(None),
        };
        let output = query
            .send(&self.client)
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;
        let items = single_or_none(id, output.items.unwrap_or_default())?;
        Ok(self.decode(items, None)?.pop())
    }

    /// Replace the stored document of an already inserted entity with its current state.
    ///
    /// Replacing an identifier that is no longer stored changes nothing and
    /// reports `matched: 0`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "employee_crud.replace_one",
            skip_all,
            fields(table = %self.table_name),
            err
        )
    )]
    pub async fn replace_one(&self, entity: &E) -> Result<ReplaceOutcome> {
        if entity.id().is_none() {
            return Err(Error::MissingId);
        }
        let put_item = write::put_item::PutItem {
            item: self.class_map.to_document(entity)?,
            write_args: self.guarded_write(Condition::NotNull),
        };
        match put_item.send(&self.client).await {
            Ok(_) => Ok(ReplaceOutcome { matched: 1 }),
            Err(error)
                if error
                    .as_service_error()
                    .is_some_and(|error| error.is_conditional_check_failed_exception()) =>
            {
                Ok(ReplaceOutcome { matched: 0 })
            }
            Err(error) => Err(aws_sdk_dynamodb::Error::from(error).into()),
        }
    }

    /// Delete the document stored under `id`. A missing identifier reports `deleted: 0`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "employee_crud.delete_one",
            skip_all,
            fields(table = %self.table_name, id = %id),
            err
        )
    )]
    pub async fn delete_one(&self, id: &key::DocumentId) -> Result<DeleteOutcome> {
        let delete_item: write::delete_item::DeleteItem<Value> = write::delete_item::DeleteItem {
            key: id.clone().into(),
            write_args: write::common::WriteArgs {
                return_values: Some(types::ReturnValue::AllOld),
                table_name: self.table_name.clone(),
                ..Default::default()
            },
        };
        let output = delete_item
            .send(&self.client)
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;
        let deleted = output
            .attributes
            .is_some_and(|attributes| !attributes.is_empty());
        Ok(DeleteOutcome {
            deleted: deleted.into(),
        })
    }
}

fn single_or_none(id: &key::DocumentId, items: Vec<Item>) -> Result<Vec<Item>> {
    match items.len() {
        0 | 1 => Ok(items),
        count => Err(Error::MultipleMatches {
            id: id.clone(),
            count,
        }),
    }
}
