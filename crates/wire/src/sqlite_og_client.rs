// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use tonic::codegen::*;

use crate::{
	ConnectionId, ConnectionRequest, Empty, ExecuteOrQueryResult, ExecuteResult, InvocationResult, Invoke,
	QueryResult, SERVICE_NAME, Statement,
};

#[derive(Debug, Clone)]
pub struct SqliteOgClient<T> {
	inner: tonic::client::Grpc<T>,
}

impl SqliteOgClient<tonic::transport::Channel> {
	pub async fn connect<D>(dst: D) -> std::result::Result<Self, tonic::transport::Error>
	where
		D: TryInto<tonic::transport::Endpoint>,
		D::Error: Into<StdError>,
	{
		let channel = tonic::transport::Endpoint::new(dst)?.connect().await?;
		Ok(Self::new(channel))
	}
}

impl<T> SqliteOgClient<T>
where
	T: tonic::client::GrpcService<tonic::body::Body>,
	T::Error: Into<StdError>,
	T::ResponseBody: Body<Data = Bytes> + std::marker::Send + 'static,
	<T::ResponseBody as Body>::Error: Into<StdError> + std::marker::Send,
{
	pub fn new(inner: T) -> Self {
		let inner = tonic::client::Grpc::new(inner);
		Self {
			inner,
		}
	}

	async fn ready(&mut self) -> std::result::Result<(), tonic::Status> {
		self.inner
			.ready()
			.await
			.map_err(|e| {
				let e: StdError = e.into();
				tonic::Status::unknown(format!("Service was not ready: {}", e))
			})
	}

	async fn unary<Req, Resp>(
		&mut self,
		request: tonic::Request<Req>,
		path: &'static str,
		method: &'static str,
	) -> std::result::Result<tonic::Response<Resp>, tonic::Status>
	where
		Req: prost::Message + Send + Sync + 'static,
		Resp: prost::Message + Default + Send + Sync + 'static,
	{
		self.ready().await?;
		let codec = tonic_prost::ProstCodec::default();
		let path = http::uri::PathAndQuery::from_static(path);
		let mut req = request;
		req.extensions_mut().insert(GrpcMethod::new(SERVICE_NAME, method));
		self.inner.unary(req, path, codec).await
	}

	pub async fn connection(
		&mut self,
		request: impl tonic::IntoRequest<ConnectionRequest>,
	) -> std::result::Result<tonic::Response<ConnectionId>, tonic::Status> {
		self.unary(request.into_request(), "/SqliteOG/Connection", "Connection").await
	}

	pub async fn query(
		&mut self,
		request: impl tonic::IntoRequest<Statement>,
	) -> std::result::Result<tonic::Response<QueryResult>, tonic::Status> {
		self.unary(request.into_request(), "/SqliteOG/Query", "Query").await
	}

	pub async fn execute(
		&mut self,
		request: impl tonic::IntoRequest<Statement>,
	) -> std::result::Result<tonic::Response<ExecuteResult>, tonic::Status> {
		self.unary(request.into_request(), "/SqliteOG/Execute", "Execute").await
	}

	pub async fn execute_or_query(
		&mut self,
		request: impl tonic::IntoRequest<Statement>,
	) -> std::result::Result<tonic::Response<ExecuteOrQueryResult>, tonic::Status> {
		self.unary(request.into_request(), "/SqliteOG/ExecuteOrQuery", "ExecuteOrQuery").await
	}

	/// Opens the bidirectional callback stream. The request must carry the
	/// connection id under the `cnx_id` metadata key.
	pub async fn callback(
		&mut self,
		request: impl tonic::IntoStreamingRequest<Message = InvocationResult>,
	) -> std::result::Result<tonic::Response<tonic::codec::Streaming<Invoke>>, tonic::Status> {
		self.ready().await?;
		let codec = tonic_prost::ProstCodec::default();
		let path = http::uri::PathAndQuery::from_static("/SqliteOG/Callback");
		let mut req = request.into_streaming_request();
		req.extensions_mut().insert(GrpcMethod::new(SERVICE_NAME, "Callback"));
		self.inner.streaming(req, path, codec).await
	}

	pub async fn close(
		&mut self,
		request: impl tonic::IntoRequest<ConnectionId>,
	) -> std::result::Result<tonic::Response<Empty>, tonic::Status> {
		self.unary(request.into_request(), "/SqliteOG/Close", "Close").await
	}

	pub async fn is_valid(
		&mut self,
		request: impl tonic::IntoRequest<ConnectionId>,
	) -> std::result::Result<tonic::Response<Empty>, tonic::Status> {
		self.unary(request.into_request(), "/SqliteOG/IsValid", "IsValid").await
	}

	pub async fn ping(
		&mut self,
		request: impl tonic::IntoRequest<Empty>,
	) -> std::result::Result<tonic::Response<Empty>, tonic::Status> {
		self.unary(request.into_request(), "/SqliteOG/Ping", "Ping").await
	}

	pub async fn reset_session(
		&mut self,
		request: impl tonic::IntoRequest<ConnectionId>,
	) -> std::result::Result<tonic::Response<ConnectionId>, tonic::Status> {
		self.unary(request.into_request(), "/SqliteOG/ResetSession", "ResetSession").await
	}
}
