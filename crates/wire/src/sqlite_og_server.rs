// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{convert::Infallible, sync::Arc};

use tonic::codegen::*;

use crate::{
	ConnectionId, ConnectionRequest, Empty, ExecuteOrQueryResult, ExecuteResult, InvocationResult, Invoke,
	QueryResult, SERVICE_NAME, Statement,
};

#[tonic::async_trait]
pub trait SqliteOg: std::marker::Send + std::marker::Sync + 'static {
	async fn connection(
		&self,
		request: tonic::Request<ConnectionRequest>,
	) -> std::result::Result<tonic::Response<ConnectionId>, tonic::Status>;

	async fn query(
		&self,
		request: tonic::Request<Statement>,
	) -> std::result::Result<tonic::Response<QueryResult>, tonic::Status>;

	async fn execute(
		&self,
		request: tonic::Request<Statement>,
	) -> std::result::Result<tonic::Response<ExecuteResult>, tonic::Status>;

	async fn execute_or_query(
		&self,
		request: tonic::Request<Statement>,
	) -> std::result::Result<tonic::Response<ExecuteOrQueryResult>, tonic::Status>;

	type CallbackStream: tokio_stream::Stream<Item = std::result::Result<Invoke, tonic::Status>>
		+ std::marker::Send
		+ 'static;

	async fn callback(
		&self,
		request: tonic::Request<tonic::Streaming<InvocationResult>>,
	) -> std::result::Result<tonic::Response<Self::CallbackStream>, tonic::Status>;

	async fn close(
		&self,
		request: tonic::Request<ConnectionId>,
	) -> std::result::Result<tonic::Response<Empty>, tonic::Status>;

	async fn is_valid(
		&self,
		request: tonic::Request<ConnectionId>,
	) -> std::result::Result<tonic::Response<Empty>, tonic::Status>;

	async fn ping(&self, request: tonic::Request<Empty>) -> std::result::Result<tonic::Response<Empty>, tonic::Status>;

	async fn reset_session(
		&self,
		request: tonic::Request<ConnectionId>,
	) -> std::result::Result<tonic::Response<ConnectionId>, tonic::Status>;
}

#[derive(Debug)]
pub struct SqliteOgServer<T> {
	inner: Arc<T>,
}

impl<T> SqliteOgServer<T> {
	pub fn new(inner: T) -> Self {
		Self::from_arc(Arc::new(inner))
	}

	pub fn from_arc(inner: Arc<T>) -> Self {
		Self {
			inner,
		}
	}
}

impl<T> Clone for SqliteOgServer<T> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T> tonic::server::NamedService for SqliteOgServer<T> {
	const NAME: &'static str = SERVICE_NAME;
}

macro_rules! unary_service {
	($svc:ident, $method:ident, $request:ty, $response:ty) => {
		struct $svc<T: SqliteOg>(Arc<T>);

		impl<T: SqliteOg> tonic::server::UnaryService<$request> for $svc<T> {
			type Response = $response;
			type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;

			fn call(&mut self, request: tonic::Request<$request>) -> Self::Future {
				let inner = Arc::clone(&self.0);
				Box::pin(async move { <T as SqliteOg>::$method(&inner, request).await })
			}
		}
	};
}

unary_service!(ConnectionSvc, connection, ConnectionRequest, ConnectionId);
unary_service!(QuerySvc, query, Statement, QueryResult);
unary_service!(ExecuteSvc, execute, Statement, ExecuteResult);
unary_service!(ExecuteOrQuerySvc, execute_or_query, Statement, ExecuteOrQueryResult);
unary_service!(CloseSvc, close, ConnectionId, Empty);
unary_service!(IsValidSvc, is_valid, ConnectionId, Empty);
unary_service!(PingSvc, ping, Empty, Empty);
unary_service!(ResetSessionSvc, reset_session, ConnectionId, ConnectionId);

struct CallbackSvc<T: SqliteOg>(Arc<T>);

impl<T: SqliteOg> tonic::server::StreamingService<InvocationResult> for CallbackSvc<T> {
	type Response = Invoke;
	type ResponseStream = T::CallbackStream;
	type Future = BoxFuture<tonic::Response<Self::ResponseStream>, tonic::Status>;

	fn call(&mut self, request: tonic::Request<tonic::Streaming<InvocationResult>>) -> Self::Future {
		let inner = Arc::clone(&self.0);
		Box::pin(async move { <T as SqliteOg>::callback(&inner, request).await })
	}
}

macro_rules! route_unary {
	($svc:ident, $inner:expr, $req:expr) => {{
		let method = $svc($inner);
		let req = $req;
		Box::pin(async move {
			let codec = tonic_prost::ProstCodec::default();
			let mut grpc = tonic::server::Grpc::new(codec);
			Ok(grpc.unary(method, req).await)
		})
	}};
}

impl<T, B> Service<http::Request<B>> for SqliteOgServer<T>
where
	T: SqliteOg,
	B: Body + std::marker::Send + 'static,
	B::Error: Into<StdError> + std::marker::Send + 'static,
{
	type Response = http::Response<tonic::body::Body>;
	type Error = Infallible;
	type Future = BoxFuture<Self::Response, Self::Error>;

	fn poll_ready(
		&mut self,
		_cx: &mut std::task::Context<'_>,
	) -> std::task::Poll<std::result::Result<(), Self::Error>> {
		std::task::Poll::Ready(Ok(()))
	}

	fn call(&mut self, req: http::Request<B>) -> Self::Future {
		let inner = self.inner.clone();
		match req.uri().path() {
			"/SqliteOG/Connection" => route_unary!(ConnectionSvc, inner, req),
			"/SqliteOG/Query" => route_unary!(QuerySvc, inner, req),
			"/SqliteOG/Execute" => route_unary!(ExecuteSvc, inner, req),
			"/SqliteOG/ExecuteOrQuery" => route_unary!(ExecuteOrQuerySvc, inner, req),
			"/SqliteOG/Close" => route_unary!(CloseSvc, inner, req),
			"/SqliteOG/IsValid" => route_unary!(IsValidSvc, inner, req),
			"/SqliteOG/Ping" => route_unary!(PingSvc, inner, req),
			"/SqliteOG/ResetSession" => route_unary!(ResetSessionSvc, inner, req),
			"/SqliteOG/Callback" => {
				let method = CallbackSvc(inner);
				Box::pin(async move {
					let codec = tonic_prost::ProstCodec::default();
					let mut grpc = tonic::server::Grpc::new(codec);
					Ok(grpc.streaming(method, req).await)
				})
			}
			_ => Box::pin(async move {
				let mut response = http::Response::new(tonic::body::Body::default());
				let headers = response.headers_mut();
				headers.insert(
					http::HeaderName::from_static("grpc-status"),
					http::HeaderValue::from(tonic::Code::Unimplemented as i32),
				);
				headers.insert(http::header::CONTENT_TYPE, http::HeaderValue::from_static("application/grpc"));
				Ok(response)
			}),
		}
	}
}
