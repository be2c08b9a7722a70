use crate::artifacts::core::error::Result;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;

pub trait Packable {
    /// Untagged payload of the object
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(oid: &ObjectId, payload: Bytes) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    /// Payload framed with its kind tag, as written to disk
    fn pack(&self) -> Result<Bytes> {
        let payload = self.serialize()?;
        let header = format!("{} {}\0", self.object_type().as_str(), payload.len());

        let mut framed = Vec::with_capacity(header.len() + payload.len());
        framed.extend_from_slice(header.as_bytes());
        framed.extend_from_slice(&payload);

        Ok(Bytes::from(framed))
    }

    fn object_id(&self) -> Result<ObjectId> {
        Ok(ObjectId::hash(&self.pack()?))
    }
}
