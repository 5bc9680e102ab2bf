// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{pin::Pin, sync::Arc};

use sqliteog_type::{Result, diagnostic::engine::task_failed, error};
use sqliteog_wire::{
	ConnectionId, ConnectionRequest, Empty, ExecuteOrQueryResult, ExecuteResult, InvocationResult, Invoke,
	QueryResult, Statement, sqlite_og_server::SqliteOg,
};
use tokio::{
	sync::{mpsc, watch},
	task::spawn_blocking,
};
use tokio_stream::{Stream, wrappers::ReceiverStream};
use tonic::{Request, Response, Status, Streaming};
use tracing::{debug, instrument};

use crate::{
	callback::{CallbackSession, connection_id},
	dispatch::Dispatcher,
	error::IntoStatus,
	registry::ConnectionRegistry,
};

pub type InvokeStream = Pin<Box<dyn Stream<Item = std::result::Result<Invoke, Status>> + Send>>;

/// The `SqliteOG` service backed by a [`ConnectionRegistry`].
#[derive(Clone)]
pub struct SqliteOgService {
	registry: Arc<ConnectionRegistry>,
	dispatcher: Dispatcher,
	shutdown: watch::Receiver<bool>,
}

impl SqliteOgService {
	pub fn new(registry: Arc<ConnectionRegistry>, shutdown: watch::Receiver<bool>) -> Self {
		Self {
			dispatcher: Dispatcher::new(registry.clone()),
			registry,
			shutdown,
		}
	}

	async fn blocking<T, F>(&self, f: F) -> Result<T>
	where
		T: Send + 'static,
		F: FnOnce(&ConnectionRegistry) -> Result<T> + Send + 'static,
	{
		let registry = self.registry.clone();
		spawn_blocking(move || f(&registry)).await.map_err(|e| error!(task_failed(e.to_string())))?
	}
}

fn respond<T>(result: Result<T>) -> std::result::Result<Response<T>, Status> {
	result.map(Response::new).map_err(IntoStatus::into_status)
}

#[tonic::async_trait]
impl SqliteOg for SqliteOgService {
	#[instrument(name = "grpc::connection", level = "debug", skip_all)]
	async fn connection(&self, request: Request<ConnectionRequest>) -> std::result::Result<Response<ConnectionId>, Status> {
		let ConnectionRequest {
			db_name,
			functions,
			aggregators,
		} = request.into_inner();

		let id = self.blocking(move |registry| registry.connect(&db_name, functions, aggregators)).await;
		respond(id.map(|id| ConnectionId {
			id: id.into(),
		}))
	}

	async fn query(&self, request: Request<Statement>) -> std::result::Result<Response<QueryResult>, Status> {
		respond(self.dispatcher.query(request.into_inner()).await)
	}

	async fn execute(&self, request: Request<Statement>) -> std::result::Result<Response<ExecuteResult>, Status> {
		respond(self.dispatcher.execute(request.into_inner()).await)
	}

	async fn execute_or_query(
		&self,
		request: Request<Statement>,
	) -> std::result::Result<Response<ExecuteOrQueryResult>, Status> {
		respond(self.dispatcher.execute_or_query(request.into_inner()).await)
	}

	type CallbackStream = InvokeStream;

	#[instrument(name = "grpc::callback", level = "debug", skip_all)]
	async fn callback(
		&self,
		request: Request<Streaming<InvocationResult>>,
	) -> std::result::Result<Response<Self::CallbackStream>, Status> {
		let id = connection_id(request.metadata()).map_err(IntoStatus::into_status)?;
		let record = self.registry.get(&id).map_err(IntoStatus::into_status)?;
		let session = CallbackSession::attach(record).map_err(IntoStatus::into_status)?;

		let (tx, rx) = mpsc::channel(1);
		let inbound = request.into_inner();
		let shutdown = self.shutdown.clone();
		tokio::spawn(async move { session.run(inbound, tx, shutdown).await });

		debug!(cnx_id = %id, "callback stream attached");
		Ok(Response::new(Box::pin(ReceiverStream::new(rx)) as InvokeStream))
	}

	#[instrument(name = "grpc::close", level = "debug", skip_all)]
	async fn close(&self, request: Request<ConnectionId>) -> std::result::Result<Response<Empty>, Status> {
		let id = request.into_inner().id;
		respond(self.blocking(move |registry| registry.close(&id)).await.map(|_| Empty {}))
	}

	async fn is_valid(&self, request: Request<ConnectionId>) -> std::result::Result<Response<Empty>, Status> {
		respond(self.registry.get(&request.into_inner().id).map(|_| Empty {}))
	}

	async fn ping(&self, _request: Request<Empty>) -> std::result::Result<Response<Empty>, Status> {
		Ok(Response::new(Empty {}))
	}

	async fn reset_session(&self, request: Request<ConnectionId>) -> std::result::Result<Response<ConnectionId>, Status> {
		let id = request.into_inner();
		respond(self.registry.get(&id.id).map(|_| id))
	}
}
