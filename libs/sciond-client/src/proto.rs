//! Vendored stubs for the `proto.daemon.v1.DaemonService` gRPC API.
//!
//! Generated code is kept in-tree so building does not require `protoc`.
//! Only the subset of fields the client reads is declared; unknown fields are
//! skipped by prost on decode.

pub mod daemon {
    pub mod v1 {
        #[derive(Clone, Copy, PartialEq, ::prost::Message)]
        pub struct AsRequest {
            #[prost(uint64, tag = "1")]
            pub isd_as: u64,
        }
        #[derive(Clone, Copy, PartialEq, ::prost::Message)]
        pub struct AsResponse {
            #[prost(uint64, tag = "1")]
            pub isd_as: u64,
            #[prost(bool, tag = "2")]
            pub core: bool,
            #[prost(uint32, tag = "3")]
            pub mtu: u32,
        }
        #[derive(Clone, Copy, PartialEq, ::prost::Message)]
        pub struct PathsRequest {
            #[prost(uint64, tag = "1")]
            pub source_isd_as: u64,
            #[prost(uint64, tag = "2")]
            pub destination_isd_as: u64,
            #[prost(bool, tag = "3")]
            pub refresh: bool,
            #[prost(bool, tag = "4")]
            pub hidden: bool,
        }
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct PathsResponse {
            #[prost(message, repeated, tag = "1")]
            pub paths: ::prost::alloc::vec::Vec<Path>,
        }
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct Path {
            #[prost(bytes = "vec", tag = "1")]
            pub raw: ::prost::alloc::vec::Vec<u8>,
            #[prost(message, optional, tag = "2")]
            pub interface: ::core::option::Option<Interface>,
            #[prost(message, repeated, tag = "3")]
            pub interfaces: ::prost::alloc::vec::Vec<PathInterface>,
            #[prost(uint32, tag = "4")]
            pub mtu: u32,
            #[prost(message, optional, tag = "5")]
            pub expiration: ::core::option::Option<::prost_types::Timestamp>,
        }
        #[derive(Clone, Copy, PartialEq, ::prost::Message)]
        pub struct PathInterface {
            #[prost(uint64, tag = "1")]
            pub isd_as: u64,
            #[prost(uint64, tag = "2")]
            pub id: u64,
        }
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct Interface {
            #[prost(message, optional, tag = "1")]
            pub address: ::core::option::Option<Underlay>,
        }
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct Underlay {
            #[prost(string, tag = "1")]
            pub address: ::prost::alloc::string::String,
        }
        #[derive(Clone, Copy, PartialEq, ::prost::Message)]
        pub struct InterfacesRequest {}
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct InterfacesResponse {
            #[prost(map = "uint64, message", tag = "1")]
            pub interfaces: ::std::collections::HashMap<u64, Interface>,
        }
        #[derive(Clone, Copy, PartialEq, ::prost::Message)]
        pub struct ServicesRequest {}
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct ServicesResponse {
            #[prost(map = "string, message", tag = "1")]
            pub services: ::std::collections::HashMap<::prost::alloc::string::String, ListService>,
        }
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct ListService {
            #[prost(message, repeated, tag = "1")]
            pub services: ::prost::alloc::vec::Vec<Service>,
        }
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct Service {
            #[prost(string, tag = "1")]
            pub uri: ::prost::alloc::string::String,
        }
        #[derive(Clone, Copy, PartialEq, ::prost::Message)]
        pub struct NotifyInterfaceDownRequest {
            #[prost(uint64, tag = "1")]
            pub isd_as: u64,
            #[prost(uint64, tag = "2")]
            pub id: u64,
        }
        #[derive(Clone, Copy, PartialEq, ::prost::Message)]
        pub struct NotifyInterfaceDownResponse {}
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct DrKeyAsHostRequest {
            #[prost(message, optional, tag = "1")]
            pub val_time: ::core::option::Option<::prost_types::Timestamp>,
            #[prost(int32, tag = "2")]
            pub protocol_id: i32,
            #[prost(uint64, tag = "3")]
            pub src_ia: u64,
            #[prost(uint64, tag = "4")]
            pub dst_ia: u64,
            #[prost(string, tag = "5")]
            pub dst_host: ::prost::alloc::string::String,
        }
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct DrKeyAsHostResponse {
            #[prost(message, optional, tag = "1")]
            pub epoch_begin: ::core::option::Option<::prost_types::Timestamp>,
            #[prost(message, optional, tag = "2")]
            pub epoch_end: ::core::option::Option<::prost_types::Timestamp>,
            #[prost(bytes = "vec", tag = "3")]
            pub key: ::prost::alloc::vec::Vec<u8>,
        }
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct DrKeyHostAsRequest {
            #[prost(message, optional, tag = "1")]
            pub val_time: ::core::option::Option<::prost_types::Timestamp>,
            #[prost(int32, tag = "2")]
            pub protocol_id: i32,
            #[prost(uint64, tag = "3")]
            pub src_ia: u64,
            #[prost(uint64, tag = "4")]
            pub dst_ia: u64,
            #[prost(string, tag = "5")]
            pub src_host: ::prost::alloc::string::String,
        }
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct DrKeyHostAsResponse {
            #[prost(message, optional, tag = "1")]
            pub epoch_begin: ::core::option::Option<::prost_types::Timestamp>,
            #[prost(message, optional, tag = "2")]
            pub epoch_end: ::core::option::Option<::prost_types::Timestamp>,
            #[prost(bytes = "vec", tag = "3")]
            pub key: ::prost::alloc::vec::Vec<u8>,
        }
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct DrKeyHostHostRequest {
            #[prost(message, optional, tag = "1")]
            pub val_time: ::core::option::Option<::prost_types::Timestamp>,
            #[prost(int32, tag = "2")]
            pub protocol_id: i32,
            #[prost(uint64, tag = "3")]
            pub src_ia: u64,
            #[prost(uint64, tag = "4")]
            pub dst_ia: u64,
            #[prost(string, tag = "5")]
            pub src_host: ::prost::alloc::string::String,
            #[prost(string, tag = "6")]
            pub dst_host: ::prost::alloc::string::String,
        }
        #[derive(Clone, PartialEq, ::prost::Message)]
        pub struct DrKeyHostHostResponse {
            #[prost(message, optional, tag = "1")]
            pub epoch_begin: ::core::option::Option<::prost_types::Timestamp>,
            #[prost(message, optional, tag = "2")]
            pub epoch_end: ::core::option::Option<::prost_types::Timestamp>,
            #[prost(bytes = "vec", tag = "3")]
            pub key: ::prost::alloc::vec::Vec<u8>,
        }

        pub mod daemon_service_client {
            #![allow(
                unused_variables,
                dead_code,
                missing_docs,
                clippy::wildcard_imports,
                clippy::let_unit_value
            )]
            use tonic::codegen::*;

            #[derive(Debug, Clone)]
            pub struct DaemonServiceClient<T> {
                inner: tonic::client::Grpc<T>,
            }
            impl DaemonServiceClient<tonic::transport::Channel> {
                /// Attempt to create a new client by connecting to a given endpoint.
                pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
                where
                    D: TryInto<tonic::transport::Endpoint>,
                    D::Error: Into<StdError>,
                {
                    let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
                    Ok(Self::new(conn))
                }
            }
            impl<T> DaemonServiceClient<T>
            where
                T: tonic::client::GrpcService<tonic::body::BoxBody>,
                T::Error: Into<StdError>,
                T::ResponseBody: Body<Data = Bytes> + std::marker::Send + 'static,
                <T::ResponseBody as Body>::Error: Into<StdError> + std::marker::Send,
            {
                pub fn new(inner: T) -> Self {
                    let inner = tonic::client::Grpc::new(inner);
                    Self { inner }
                }
                pub async fn paths(
                    &mut self,
                    request: impl tonic::IntoRequest<super::PathsRequest>,
                ) -> std::result::Result<tonic::Response<super::PathsResponse>, tonic::Status>
                {
                    self.inner.ready().await.map_err(|e| {
                        tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
                    })?;
                    let codec = tonic::codec::ProstCodec::default();
                    let path = http::uri::PathAndQuery::from_static(
                        "/proto.daemon.v1.DaemonService/Paths",
                    );
                    let mut req = request.into_request();
                    req.extensions_mut()
                        .insert(GrpcMethod::new("proto.daemon.v1.DaemonService", "Paths"));
                    self.inner.unary(req, path, codec).await
                }
                pub async fn r#as(
                    &mut self,
                    request: impl tonic::IntoRequest<super::AsRequest>,
                ) -> std::result::Result<tonic::Response<super::AsResponse>, tonic::Status>
                {
                    self.inner.ready().await.map_err(|e| {
                        tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
                    })?;
                    let codec = tonic::codec::ProstCodec::default();
                    let path =
                        http::uri::PathAndQuery::from_static("/proto.daemon.v1.DaemonService/AS");
                    let mut req = request.into_request();
                    req.extensions_mut()
                        .insert(GrpcMethod::new("proto.daemon.v1.DaemonService", "AS"));
                    self.inner.unary(req, path, codec).await
                }
                pub async fn interfaces(
                    &mut self,
                    request: impl tonic::IntoRequest<super::InterfacesRequest>,
                ) -> std::result::Result<tonic::Response<super::InterfacesResponse>, tonic::Status>
                {
                    self.inner.ready().await.map_err(|e| {
                        tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
                    })?;
                    let codec = tonic::codec::ProstCodec::default();
                    let path = http::uri::PathAndQuery::from_static(
                        "/proto.daemon.v1.DaemonService/Interfaces",
                    );
                    let mut req = request.into_request();
                    req.extensions_mut()
                        .insert(GrpcMethod::new("proto.daemon.v1.DaemonService", "Interfaces"));
                    self.inner.unary(req, path, codec).await
                }
                pub async fn services(
                    &mut self,
                    request: impl tonic::IntoRequest<super::ServicesRequest>,
                ) -> std::result::Result<tonic::Response<super::ServicesResponse>, tonic::Status>
                {
                    self.inner.ready().await.map_err(|e| {
                        tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
                    })?;
                    let codec = tonic::codec::ProstCodec::default();
                    let path = http::uri::PathAndQuery::from_static(
                        "/proto.daemon.v1.DaemonService/Services",
                    );
                    let mut req = request.into_request();
                    req.extensions_mut()
                        .insert(GrpcMethod::new("proto.daemon.v1.DaemonService", "Services"));
                    self.inner.unary(req, path, codec).await
                }
                pub async fn notify_interface_down(
                    &mut self,
                    request: impl tonic::IntoRequest<super::NotifyInterfaceDownRequest>,
                ) -> std::result::Result<
                    tonic::Response<super::NotifyInterfaceDownResponse>,
                    tonic::Status,
                > {
                    self.inner.ready().await.map_err(|e| {
                        tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
                    })?;
                    let codec = tonic::codec::ProstCodec::default();
                    let path = http::uri::PathAndQuery::from_static(
                        "/proto.daemon.v1.DaemonService/NotifyInterfaceDown",
                    );
                    let mut req = request.into_request();
                    req.extensions_mut().insert(GrpcMethod::new(
                        "proto.daemon.v1.DaemonService",
                        "NotifyInterfaceDown",
                    ));
                    self.inner.unary(req, path, codec).await
                }
                pub async fn dr_key_as_host(
                    &mut self,
                    request: impl tonic::IntoRequest<super::DrKeyAsHostRequest>,
                ) -> std::result::Result<tonic::Response<super::DrKeyAsHostResponse>, tonic::Status>
                {
                    self.inner.ready().await.map_err(|e| {
                        tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
                    })?;
                    let codec = tonic::codec::ProstCodec::default();
                    let path = http::uri::PathAndQuery::from_static(
                        "/proto.daemon.v1.DaemonService/DRKeyASHost",
                    );
                    let mut req = request.into_request();
                    req.extensions_mut().insert(GrpcMethod::new(
                        "proto.daemon.v1.DaemonService",
                        "DRKeyASHost",
                    ));
                    self.inner.unary(req, path, codec).await
                }
                pub async fn dr_key_host_as(
                    &mut self,
                    request: impl tonic::IntoRequest<super::DrKeyHostAsRequest>,
                ) -> std::result::Result<tonic::Response<super::DrKeyHostAsResponse>, tonic::Status>
                {
                    self.inner.ready().await.map_err(|e| {
                        tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
                    })?;
                    let codec = tonic::codec::ProstCodec::default();
                    let path = http::uri::PathAndQuery::from_static(
                        "/proto.daemon.v1.DaemonService/DRKeyHostAS",
                    );
                    let mut req = request.into_request();
                    req.extensions_mut().insert(GrpcMethod::new(
                        "proto.daemon.v1.DaemonService",
                        "DRKeyHostAS",
                    ));
                    self.inner.unary(req, path, codec).await
                }
                pub async fn dr_key_host_host(
                    &mut self,
                    request: impl tonic::IntoRequest<super::DrKeyHostHostRequest>,
                ) -> std::result::Result<tonic::Response<super::DrKeyHostHostResponse>, tonic::Status>
                {
                    self.inner.ready().await.map_err(|e| {
                        tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
                    })?;
                    let codec = tonic::codec::ProstCodec::default();
                    let path = http::uri::PathAndQuery::from_static(
                        "/proto.daemon.v1.DaemonService/DRKeyHostHost",
                    );
                    let mut req = request.into_request();
                    req.extensions_mut().insert(GrpcMethod::new(
                        "proto.daemon.v1.DaemonService",
                        "DRKeyHostHost",
                    ));
                    self.inner.unary(req, path, codec).await
                }
            }
        }
    }
}
